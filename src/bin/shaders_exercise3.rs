use learngl::lessons::shaders_exercise3::ShadersExercise3;

fn main() {
    std::process::exit(learngl::app::run::<ShadersExercise3>());
}
