use anyhow::{Context, Result};

use framebench::core::cancel::CancellationToken;
use framebench::display::DisplayContext;
use framebench::runner::SceneRunner;
use framebench::scenes;

fn main() -> Result<()> {
    env_logger::init();

    println!("framebench");
    println!("==========");
    println!();

    let cancel = CancellationToken::new();
    cancel.install_ctrl_c_handler()?;

    let mut display = DisplayContext::new().context("failed to initialize the display")?;

    let info = display.gpu().adapter_info();
    let (width, height) = display.dimensions();
    println!("Environment information");
    println!("-----------------------");
    println!("Adapter : {} ({:?})", info.name, info.backend);
    println!("Driver  : {} {}", info.driver, info.driver_info);
    println!("Surface : {}x{} {:?}", width, height, display.surface_format());
    println!();

    let mut scenes = scenes::registry(display.gpu(), display.surface_format());
    let mut runner = SceneRunner::new(cancel);
    runner
        .run_all(&mut display, &mut scenes)
        .context("failed to run scenes")?;

    Ok(())
}
