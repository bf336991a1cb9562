/// A source of uniformly distributed candidate identifiers.
///
/// The allocator draws candidates through this seam so tests can script the
/// exact sequence of proposals.
pub trait RandSource {
    /// Returns a uniform random value in `[floor, ceiling]`, inclusive.
    fn random_in(&self, floor: u32, ceiling: u32) -> u32;
}
