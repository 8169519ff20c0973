mod app;
mod catalog;
mod input;
mod kinematics;
mod render;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
