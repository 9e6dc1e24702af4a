use fiducials::{generate_seeded, pairing_count, search, SynthParams};

fn main() {
    env_logger::init();

    let params = SynthParams::default();
    let case = generate_seeded(&params, 7);
    println!(
        "Base: {} points in a cube of side {}",
        case.base.len(),
        params.scale
    );
    println!(
        "Sampled: {} points, sigma = {}, true mapping {:?}",
        case.sampled.len(),
        params.sigma,
        case.mapping
    );
    if let Some(candidates) = pairing_count(case.base.len(), case.sampled.len()) {
        println!("Candidates to score: {}", candidates);
    }

    match search(&case.sampled, &case.base) {
        Ok(result) => {
            println!("Mean error: {:.4}", result.mean_error);
            println!("RMS error:  {:.4}", result.rms_error);
            println!(
                "Evaluated {} candidates, skipped {}",
                result.candidates_evaluated, result.candidates_skipped
            );
            for c in &result.correspondences {
                println!(
                    "  {} -> {}  (distance {:.3})",
                    case.sampled.label(c.source_index).unwrap_or("?"),
                    case.base.label(c.target_index).unwrap_or("?"),
                    c.distance
                );
            }
        }
        Err(err) => eprintln!("registration failed: {}", err),
    }
}
