use learngl::lessons::transformations::Transformations;

fn main() {
    std::process::exit(learngl::app::run::<Transformations>());
}
