#[cfg(not(target_arch = "wasm32"))]
use demo::MyApp;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    eframe::run_native(
        "Network map",
        Default::default(),
        Box::new(|_cc| Ok(Box::new(MyApp::new()?))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    println!("This demo is not meant to be compiled for WASM.");
}
