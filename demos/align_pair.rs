use fiducials::{align_paired, apply_transform, mean_residual, rms_residual, FiducialSet, RigidTransform};

fn main() {
    // Moving markers in their own frame.
    let moving = FiducialSet::from_xyz(
        vec![0.0, 4.0, 1.0, -3.0, 2.0],
        vec![0.0, 1.0, 5.0, 2.0, -4.0],
        vec![0.0, 2.0, -1.0, 6.0, 3.0],
    );
    println!("Moving: {} points", moving.len());

    // Fixed markers: the same points after a 90-degree turn and a shift.
    let truth = RigidTransform {
        rotation: [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [10.0, -2.0, 3.0],
    };
    let fixed = apply_transform(&moving, &truth);
    println!("Fixed: {} points (rotated 90 deg about z, shifted)", fixed.len());

    match align_paired(&moving, &fixed) {
        Ok(t) => {
            println!("Rotation rows: {:?}", t.rotation);
            println!(
                "Translation: [{:.4}, {:.4}, {:.4}]",
                t.translation[0], t.translation[1], t.translation[2]
            );
            println!("Orthonormal: {}", t.is_orthonormal(1e-4));
            let mean = mean_residual(&moving, &fixed, &t).unwrap_or(f32::NAN);
            let rms = rms_residual(&moving, &fixed, &t).unwrap_or(f32::NAN);
            println!("Mean residual: {:.6}", mean);
            println!("RMS residual:  {:.6}", rms);
        }
        Err(err) => eprintln!("alignment failed: {}", err),
    }
}
