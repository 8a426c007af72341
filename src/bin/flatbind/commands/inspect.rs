//! `flatbind inspect` command

use anyhow::Result;

use flatbind::ops::{inspect, InspectFormat};

use super::load_config;
use crate::cli::InspectArgs;

pub fn execute(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let format = if args.json {
        InspectFormat::Json
    } else {
        InspectFormat::Text
    };

    print!("{}", inspect(&config, &args.input, format)?);
    if args.json {
        println!();
    }

    Ok(())
}
