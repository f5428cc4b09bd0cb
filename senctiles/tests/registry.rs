use senctiles::{TileService, chart::StubChartSource};
use senctiles_core::compression::decompress_gzip;
use senctiles_geometry::vector_tile::VectorTile;
use std::{collections::HashSet, sync::Arc, thread};

#[test]
fn concurrent_build_senc_issues_every_number_once() {
	const THREADS: usize = 16;
	const PER_THREAD: usize = 25;

	let service = Arc::new(TileService::new(Arc::new(StubChartSource::accept_missing())));
	let workers: Vec<_> = (0..THREADS)
		.map(|t| {
			let service = Arc::clone(&service);
			thread::spawn(move || {
				(0..PER_THREAD)
					.map(|i| service.build_senc(&format!("chart_{t}_{i}.000"), "senc").unwrap())
					.collect::<Vec<_>>()
			})
		})
		.collect();

	let handles: Vec<String> = workers
		.into_iter()
		.flat_map(|worker| worker.join().unwrap())
		.map(|handle| handle.to_string())
		.collect();
	let unique: HashSet<&String> = handles.iter().collect();
	assert_eq!(unique.len(), THREADS * PER_THREAD);

	let expected: HashSet<String> = (1..=THREADS * PER_THREAD).map(|n| format!("senc_{n}")).collect();
	assert_eq!(handles.into_iter().collect::<HashSet<_>>(), expected);
}

#[test]
fn tiles_are_served_while_charts_register() {
	let service = Arc::new(
		TileService::new(Arc::new(StubChartSource::accept_missing()))
			.with_safety_contour(10.0)
			.unwrap(),
	);
	let first = service.build_senc("first.000", "senc").unwrap();

	let writer = {
		let service = Arc::clone(&service);
		thread::spawn(move || {
			for i in 0..200 {
				service.build_senc(&format!("more_{i}.000"), "cm93").unwrap();
			}
		})
	};
	let readers: Vec<_> = (0..4)
		.map(|_| {
			let service = Arc::clone(&service);
			let handle = first.clone();
			thread::spawn(move || {
				for _ in 0..50 {
					let blob = service.query_tile_mvt(handle.as_str(), 10, 300, 400).unwrap();
					let tile = VectorTile::from_blob(&decompress_gzip(&blob).unwrap()).unwrap();
					assert_eq!(tile.layers.len(), 1);
				}
			})
		})
		.collect();

	writer.join().unwrap();
	for reader in readers {
		reader.join().unwrap();
	}
	assert_eq!(service.registry().len(), 201);
	assert_eq!(service.registry().handles().last().unwrap().as_str(), "cm93_201");
}
