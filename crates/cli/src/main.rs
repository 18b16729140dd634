//! `fief` binary.
//!
//! Loads the city registry from a JSON-lines store and answers one query per
//! invocation. Results are printed to stdout as JSON; logs go to stderr.

mod cli;

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use fief_registry::{City, CityId, CityRegistry, GridPos, JsonLinesStore, RegistryConfig, RoleId};
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = match &cli.config {
		Some(path) => RegistryConfig::load(path)?,
		None => RegistryConfig::default(),
	};
	let store = Arc::new(JsonLinesStore::open(&cli.store));
	let registry = CityRegistry::new(&config, store.clone())?;
	registry.load();

	match cli.command {
		Command::Found {
			id,
			owner,
			x,
			y,
			name,
			main,
		} => {
			let mut city = City::new(CityId(id), RoleId(owner), GridPos::new(x, y)).with_name(name);
			city.is_main = main;
			if let Some(existing) = registry.get(city.id) {
				bail!("city {} already exists at {}", existing.id, existing.pos);
			}
			registry.try_register(city.clone())?;
			store
				.append(&city)
				.with_context(|| format!("persisting city {id} to {}", store.path().display()))?;
			info!(city = id, owner, x, y, "founded city");
			print_json(&city)
		}
		Command::Get { id } => match registry.lookup(CityId(id))? {
			Some(city) => print_json(&*city),
			None => bail!("city {id} not found"),
		},
		Command::Owner { owner } => {
			let cities = registry.by_owner(RoleId(owner)).unwrap_or_default();
			print_json(&cities)
		}
		Command::At { x, y } => print_json(&registry.at_position(x, y)),
		Command::Scan { x, y } => print_json(&registry.scan(x, y)),
		Command::Block { x, y, length } => print_json(&registry.scan_block(x, y, length)),
		Command::Check => {
			registry.verify()?;
			print_json(&registry.stats())
		}
	}
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("fief_registry=debug,fief=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
