use learngl::lessons::hello_window_clear::HelloWindowClear;

fn main() {
    std::process::exit(learngl::app::run::<HelloWindowClear>());
}
