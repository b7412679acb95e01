//! Debug tool for comparing road layouts across seeds
//! Generates a grid of city maps for consecutive seeds with the default config

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};
use log::info;
use rayon::prelude::*;

use city_generator::city::{CityConfig, CityGenerator};
use city_generator::export::render_tile_image;

const FIRST_SEED: u64 = 42;
const COLS: usize = 3;
const ROWS: usize = 3;
const PADDING: u32 = 4;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = CityConfig::default();
    let generator = CityGenerator::new(config)?;
    let seeds: Vec<u64> = (0..(COLS * ROWS) as u64).map(|i| FIRST_SEED + i).collect();

    println!("Generating {} maps (seeds {}..={})...", seeds.len(), seeds[0], seeds[seeds.len() - 1]);

    // Each run owns its grid and rng, so seeds can be generated side by side
    let images: Vec<(u64, RgbImage)> = seeds
        .par_iter()
        .map(|&seed| {
            let data = generator.generate_default(seed);
            info!("Seed {}: {} zones", seed, data.zones.len());
            (seed, render_tile_image(&data.tiles, &generator.config().palette))
        })
        .collect();

    let grid = create_grid(&images, COLS, ROWS);
    grid.save("seed_comparison.png")?;
    println!("Saved seed_comparison.png");
    for (i, (seed, _)) in images.iter().enumerate() {
        println!("  [{}, {}] seed {}", i % COLS, i / COLS, seed);
    }

    Ok(())
}

/// Tile images left to right, top to bottom, separated by dark padding.
fn create_grid(images: &[(u64, RgbImage)], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].1.width();
    let cell_height = images[0].1.height();

    let grid_width = cell_width * cols as u32 + PADDING * (cols as u32 + 1);
    let grid_height = cell_height * rows as u32 + PADDING * (rows as u32 + 1);

    let mut grid: RgbImage = ImageBuffer::from_pixel(grid_width, grid_height, Rgb([40, 40, 40]));

    for (idx, (_, img)) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = PADDING + col as u32 * (cell_width + PADDING);
        let y_offset = PADDING + row as u32 * (cell_height + PADDING);

        for y in 0..cell_height {
            for x in 0..cell_width {
                grid.put_pixel(x_offset + x, y_offset + y, *img.get_pixel(x, y));
            }
        }
    }

    grid
}
