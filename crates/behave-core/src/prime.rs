//! Prime sizing for name dictionaries.
//!
//! The scan pass counts how many entries of each kind the definition document
//! declares; each dictionary is then created with a capacity equal to the
//! smallest tabulated prime at or above that count. This is a tuning knob for
//! the standard map, not a structural requirement.

/// Ascending primes used for dictionary sizing. The last entry caps the table.
pub const PRIMES: &[usize] = &[
    1, 2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
    89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181,
    191, 193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409,
    419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523,
    541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613, 617, 619, 631, 641, 643, 647,
    653, 659, 661, 673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773,
    787, 797, 809, 811, 821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911,
    919, 929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997, 1009, 1103, 1201, 1301, 1399,
    1499, 1601, 1699, 1801, 1901, 1999, 2099, 2203, 2297, 2399, 2503, 2699, 2801, 2999, 3203,
    3499, 3701, 3989, 4201, 4493, 4801, 4999, 5297, 5501, 5801, 6007, 6299, 6599, 6899, 7103,
    7499, 7793, 8101, 8501, 8803, 9103, 9403, 9719, 9973,
];

/// Largest tabulated prime; counts above it are clamped to it.
pub const MAX_PRIME: usize = 9973;

/// Smallest tabulated prime `>= n`, or [`MAX_PRIME`] when `n` exceeds the table.
pub fn prime_gte(n: usize) -> usize {
    match PRIMES.binary_search(&n) {
        Ok(i) => PRIMES[i],
        Err(i) => PRIMES.get(i).copied().unwrap_or(MAX_PRIME),
    }
}
