use learngl::lessons::hello_triangle::HelloTriangle;

fn main() {
    std::process::exit(learngl::app::run::<HelloTriangle>());
}
