//! Example comparing how evenly two checksums spread over their
//! output spaces, with a simple histogram visualization.
//! This doesn't show weaknesses with any degree of certainty, it only
//! shows a rough visualization; further statistical tests would be
//! needed for that.
use std::time::{SystemTime, UNIX_EPOCH};

use checksum_mosaic::crc::{BitOrder, Crc, CrcConfiguration};
use checksum_mosaic::registry::Engine;
use checksum_mosaic::Checksum;

const NUM_EXPERIMENTS: usize = 1000;
const NUM_BINS: usize = 10;
const MESSAGE_SIZE: usize = 50;

/// Use the CRC code as a crude PRNG
/// It's not secure, but it works for the purposes here as an example.
fn prng(state: &mut Crc<'_>) -> u64 {
    state.update((state.state() >> 56) as u8)
}

/// Run an experiment for a given checksum engine.
/// Generates random byte strings, checksums each one, and returns the
/// results normalized into [0, 1) of the algorithm's output space.
fn run_experiment(prng_crc: &mut Crc<'_>, engine: &mut Engine<'_>) -> [f64; NUM_EXPERIMENTS] {
    let mut random_buffer: [u8; MESSAGE_SIZE] = [0; MESSAGE_SIZE];
    let mut experiments: [f64; NUM_EXPERIMENTS] = [0.0; NUM_EXPERIMENTS];

    let space = 2f64.powi(engine.width_bits() as i32);

    for experiment in &mut experiments {
        for item in &mut random_buffer {
            *item = (prng(prng_crc) >> 56) as u8;
        }

        let value = engine.compute(&random_buffer);
        *experiment = value.value() as f64 / space;
    }

    experiments
}

/// Draw a histogram from experiment data
fn draw_histogram(experiments: [f64; NUM_EXPERIMENTS]) {
    let mut bins: [u32; NUM_BINS] = [0; NUM_BINS];

    for fraction in experiments {
        let bin = ((fraction * NUM_BINS as f64).floor() as usize).min(NUM_BINS - 1);
        bins[bin] += 1;
    }

    // graph width in characters
    let width = 55;

    // The display assumes a roughly uniform distribution and sets
    // aside some headroom for bins above the average.
    let avg_stars_per_bin = NUM_EXPERIMENTS as f64 / NUM_BINS as f64 * 1.8;
    let line_div = avg_stars_per_bin / width as f64;

    for (i, total) in bins.iter().enumerate() {
        print!(
            "{:.2} - {:.2}: ",
            i as f64 / NUM_BINS as f64,
            (i + 1) as f64 / NUM_BINS as f64
        );
        let stars_to_print = (*total as f64 / line_div).floor() as u32;
        for _ in 0..stars_to_print {
            print!("*");
        }
        println!();
    }
}

fn main() {
    // Use a CRC as a PRNG
    let t = SystemTime::now();
    let t = t.duration_since(UNIX_EPOCH).unwrap().as_millis();
    let seed: u64 = (t % (u32::MAX as u128 + 1)) as u64;
    let mut prng_crc = Crc::new(
        CrcConfiguration::new(
            "CRC-32/ISO-HDLC",
            32,
            BitOrder::LSBFirst,
            0x04C11DB7,
            true,
            Some(seed),
            Some(0xFFFFFFFF),
        )
        .expect("valid configuration"),
        true,
    );

    // The dual modular checksum, showing a histogram of values
    let mut adler = Engine::for_name("adler", None).expect("known algorithm");
    let experiments = run_experiment(&mut prng_crc, &mut adler);
    println!("Dual modular checksum histogram");
    draw_histogram(experiments);

    println!();

    // CRC-32, showing a histogram of values
    let configuration = CrcConfiguration::new(
        "CRC-32/ISO-HDLC",
        32,
        BitOrder::LSBFirst,
        0x04C11DB7,
        true,
        Some(0xFFFFFFFF),
        Some(0xFFFFFFFF),
    )
    .expect("valid configuration");
    let mut crc32 = Engine::new(checksum_mosaic::registry::AlgorithmConfig::Crc(configuration))
        .expect("valid configuration");
    let experiments = run_experiment(&mut prng_crc, &mut crc32);
    println!("CRC-32 histogram");
    draw_histogram(experiments);
}
