//! Parameter table listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use hibiki_hall::{ParamFlags, ParameterTable, PluginInfo};

use super::common::HallArgs;

#[derive(Args)]
pub struct ParamsArgs {
    #[command(flatten)]
    hall: HallArgs,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let config = args.hall.config()?;
    let hall = config.build()?;
    let info = PluginInfo::HALL;
    let (major, minor, patch) = info.version;

    println!("{} {}.{}.{}", info.label, major, minor, patch);
    println!("{}", "=".repeat(info.label.len() + 6));
    println!();
    println!("{}", info.description);
    println!();
    println!(
        "  {:>3}  {:8}  {:16}  {:>10}  {:4}  {}",
        "#", "Symbol", "Name", "Value", "Unit", "Range (default)"
    );
    println!(
        "  {:>3}  {:8}  {:16}  {:>10}  {:4}  {}",
        "-", "------", "----", "-----", "----", "---------------"
    );

    for (index, desc) in ParameterTable.iter().enumerate() {
        let value = hall.get_parameter_value(index);
        let value = if desc.flags.contains(ParamFlags::STEPPED) {
            format!("{value:.0}")
        } else {
            format!("{value:.2}")
        };
        println!(
            "  {:>3}  {:8}  {:16}  {:>10}  {:4}  {}-{} ({})",
            index,
            desc.short_name,
            desc.name,
            value,
            desc.unit.label(),
            desc.min,
            desc.max,
            desc.default
        );
    }

    println!();
    println!("Example usage:");
    println!();
    println!("  hibiki render input.wav output.wav --size 3 --presence 1 --param l_time=3.5");

    Ok(())
}
