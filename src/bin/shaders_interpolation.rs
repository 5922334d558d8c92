use learngl::lessons::shaders_interpolation::ShadersInterpolation;

fn main() {
    std::process::exit(learngl::app::run::<ShadersInterpolation>());
}
