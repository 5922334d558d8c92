use learngl::lessons::hello_triangle_exercise3::HelloTriangleExercise3;

fn main() {
    std::process::exit(learngl::app::run::<HelloTriangleExercise3>());
}
