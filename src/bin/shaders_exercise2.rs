use learngl::lessons::shaders_exercise2::ShadersExercise2;

fn main() {
    std::process::exit(learngl::app::run::<ShadersExercise2>());
}
