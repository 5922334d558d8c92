use learngl::lessons::textures::Textures;

fn main() {
    std::process::exit(learngl::app::run::<Textures>());
}
