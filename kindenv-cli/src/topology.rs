use kindenv_core::prelude::*;
use kindenv_core::topology::render_topology;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[arg(long, long_help = "node image to substitute into every node")]
    pub image: Option<String>,
}

pub fn cmd(args: &Args) -> EmptyResult {
    print!("{}", render_topology(args.image.as_deref())?);
    Ok(())
}
