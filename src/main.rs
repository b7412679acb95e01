use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use city_generator::ascii;
use city_generator::city::{CityConfig, CityGenerator, TileType};
use city_generator::export;
use city_generator::map_export;

#[derive(Parser, Debug)]
#[command(name = "city_generator")]
#[command(about = "Generate procedural city maps with roads and buildable zones")]
struct Args {
    /// JSON config file; command-line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the map in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of main road seed points
    #[arg(short = 'r', long)]
    roads: Option<usize>,

    /// Width of main roads in tiles
    #[arg(long)]
    road_width: Option<usize>,

    /// Minimum distance of road seeds from the map edge
    #[arg(long)]
    edge_margin: Option<u32>,

    /// Minimum Euclidean distance between road seeds
    #[arg(long)]
    min_distance: Option<f32>,

    /// Minimum per-axis distance between road seeds
    #[arg(long)]
    axis_distance: Option<f32>,

    /// Candidate points drawn when sampling road seeds
    #[arg(long)]
    batch_size: Option<usize>,

    /// Zones seeded from random cells before the sweep
    #[arg(long)]
    zone_samples: Option<usize>,

    /// Map name used for output files
    #[arg(short, long)]
    name: Option<String>,

    /// Directory for output files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Export the tile map as PNG
    #[arg(long)]
    png: bool,

    /// Export the zone map as PNG
    #[arg(long)]
    zones_png: bool,

    /// Export a text report with ASCII map views
    #[arg(long)]
    ascii: bool,

    /// Export the game's JSON block map
    #[arg(long)]
    json: bool,

    /// Print the ASCII tile map to stdout
    #[arg(long)]
    print: bool,
}

impl Args {
    /// Start from the config file (or defaults) and apply command-line overrides.
    fn build_config(&self) -> Result<CityConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => CityConfig::from_json_file(path)?,
            None => CityConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(roads) = self.roads {
            config.num_main_road_points = roads;
        }
        if let Some(road_width) = self.road_width {
            config.main_road_width = road_width;
        }
        if let Some(margin) = self.edge_margin {
            config.main_roads_sampler.min_distance_from_edge = Some(margin);
        }
        if let Some(distance) = self.min_distance {
            config.main_roads_sampler.min_distance_from_others = Some(distance);
        }
        if let Some(distance) = self.axis_distance {
            config.main_roads_sampler.min_distance_from_others_axis = Some(distance);
        }
        if let Some(batch) = self.batch_size {
            config.main_roads_sampler.batch_sample_count = batch;
        }
        if let Some(samples) = self.zone_samples {
            config.zones.sample_count = samples;
        }
        if let Some(name) = &self.name {
            config.map_name = name.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }

        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.build_config()?;
    let generator = CityGenerator::new(config)?;
    let config = generator.config();

    let seed = args.seed.unwrap_or_else(|| rand::random());
    info!("Generating city '{}' with seed: {}", config.map_name, seed);
    info!("Map size: {}x{}", config.width, config.height);

    let data = generator.generate_default(seed);

    let road_tiles = data.tiles.count_where(|&t| t == TileType::Road);
    info!(
        "{} road tiles ({:.1}%), {} zones",
        road_tiles,
        100.0 * road_tiles as f64 / data.tiles.len() as f64,
        data.zones.len()
    );

    if args.png || args.zones_png || args.ascii || args.json {
        fs::create_dir_all(&config.output_dir)?;
    }

    if args.png {
        let path = config.output_path("output.png");
        export::export_tile_map(&data.tiles, &config.palette, &path)?;
        info!("Wrote tile map: {}", path.display());
    }

    if args.zones_png {
        let path = config.output_path("zones.png");
        export::export_zone_map(&data.zone_map, config.palette.road, &path)?;
        info!("Wrote zone map: {}", path.display());
    }

    if args.ascii {
        let path = config.output_path("map.txt");
        ascii::export_map_file(&data, &config.map_name, seed, &path)?;
        info!("Wrote text map: {}", path.display());
    }

    if args.json {
        let path = config.output_path("map.json");
        let game_map = map_export::build_game_map(&data.tiles, &config.textures, &config.map_name, config.map_layers);
        map_export::export_game_map(&game_map, &path)?;
        info!("Wrote block map: {} ({} blocks)", path.display(), game_map.blocks.len());
    }

    if args.print {
        print!("{}", ascii::render_tiles(&data.tiles));
    }

    Ok(())
}
