use learngl::lessons::hello_triangle_exercise1::HelloTriangleExercise1;

fn main() {
    std::process::exit(learngl::app::run::<HelloTriangleExercise1>());
}
