use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fief")]
#[command(about = "Inspect and seed the city registry")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// City store (one JSON record per line)
	#[arg(long, short = 's', value_name = "PATH", default_value = "cities.jsonl")]
	pub store: PathBuf,

	/// Registry config (TOML); defaults apply when omitted
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Found a city: persist it to the store and register it
	Found {
		#[arg(long)]
		id: u32,
		#[arg(long)]
		owner: u32,
		#[arg(long, allow_hyphen_values = true)]
		x: i32,
		#[arg(long, allow_hyphen_values = true)]
		y: i32,
		/// Display name
		#[arg(long, default_value = "")]
		name: String,
		/// Mark as the owner's capital
		#[arg(long)]
		main: bool,
	},
	/// Look up a city by id
	Get { id: u32 },
	/// List the cities of an owner
	Owner { owner: u32 },
	/// Show the city on a cell
	At {
		#[arg(allow_hyphen_values = true)]
		x: i32,
		#[arg(allow_hyphen_values = true)]
		y: i32,
	},
	/// List cities in the scan window centred on a cell
	Scan {
		#[arg(allow_hyphen_values = true)]
		x: i32,
		#[arg(allow_hyphen_values = true)]
		y: i32,
	},
	/// List cities in a square anchored at a cell
	Block {
		#[arg(allow_hyphen_values = true)]
		x: i32,
		#[arg(allow_hyphen_values = true)]
		y: i32,
		length: i32,
	},
	/// Load the store, verify index consistency and print counters
	Check,
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_negative_scan_centre() {
		let cli = Cli::try_parse_from(["fief", "scan", "-1", "4"]).unwrap();
		assert!(matches!(cli.command, Command::Scan { x: -1, y: 4 }));
		assert_eq!(cli.store, PathBuf::from("cities.jsonl"));
	}

	#[test]
	fn parses_found() {
		let cli = Cli::try_parse_from([
			"fief", "--store", "/tmp/c.jsonl", "found", "--id", "1", "--owner", "7", "--x", "3", "--y", "4", "--main",
		])
		.unwrap();
		match cli.command {
			Command::Found { id, owner, x, y, main, .. } => assert_eq!((id, owner, x, y, main), (1, 7, 3, 4, true)),
			other => panic!("unexpected command: {other:?}"),
		}
	}
}
