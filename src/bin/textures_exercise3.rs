use learngl::lessons::textures_exercise3::TexturesExercise3;

fn main() {
    std::process::exit(learngl::app::run::<TexturesExercise3>());
}
