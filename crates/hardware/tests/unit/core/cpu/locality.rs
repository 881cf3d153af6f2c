//! Locality Sampler Tests.

use graphsim_core::core::cpu::LocalitySampler;
use graphsim_core::core::cpu::locality::LOCALITY_SCALE;

/// No samples report zero locality.
#[test]
fn empty_sampler_reports_zero() {
    let s = LocalitySampler::new(8, 6);
    assert_eq!(s.samples(), 0);
    assert_eq!(s.scaled(), (0, 0));
}

/// Re-touching a line is temporal reuse, touching a neighbor is spatial.
#[test]
fn classifies_reuse() {
    let mut s = LocalitySampler::new(8, 6);
    s.push(0x1000, 8);
    s.push(0x1000, 8);
    s.push(0x1040, 8);
    s.push(0x5000, 8);

    assert_eq!(s.samples(), 4);
    assert_eq!(s.scaled(), (LOCALITY_SCALE / 4, LOCALITY_SCALE / 4));
}

/// An access straddling a line boundary samples both lines.
#[test]
fn straddling_access_samples_each_line() {
    let mut s = LocalitySampler::new(8, 6);
    s.push(0x103c, 8);
    assert_eq!(s.samples(), 2);
    assert_eq!(s.scaled(), (LOCALITY_SCALE / 2, 0));
}

/// Lines older than the window are forgotten.
#[test]
fn window_forgets_old_lines() {
    let mut s = LocalitySampler::new(2, 6);
    s.push(0x0000, 1);
    s.push(0x4000, 1);
    s.push(0x8000, 1);
    s.push(0x0000, 1);
    assert_eq!(s.scaled(), (0, 0));
}
