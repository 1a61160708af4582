mod anim;
mod app;
mod config;
mod input;
mod render;
mod scene;
mod signal;

fn main() {
    env_logger::init();
    log::info!("spriteloop starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
