#![allow(dead_code)]

use std::sync::Arc;

use fief_registry::{City, CityId, CityRegistry, CityStore, GridPos, RegistryConfig, RoleId};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn city(id: u32, owner: u32, x: i32, y: i32) -> City {
	City::new(CityId(id), RoleId(owner), GridPos::new(x, y))
}

/// Registry over a `width` x `height` map with the default scan window.
pub fn registry(width: u32, height: u32, store: Arc<dyn CityStore>) -> CityRegistry {
	let config = RegistryConfig::from_toml_str(&format!("[map]\nwidth = {width}\nheight = {height}\n"))
		.expect("valid test config");
	CityRegistry::new(&config, store).expect("valid test bounds")
}

pub fn positions(cities: &[Arc<City>]) -> Vec<(i32, i32)> {
	cities.iter().map(|c| (c.pos.x, c.pos.y)).collect()
}
