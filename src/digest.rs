//! MD5 (RFC 1321) hex digest.
//!
//! The mailing-list provider addresses a contact by the MD5 of its lowercased
//! email address, so this is a lookup key, not a security primitive.

const BLOCK_LEN: usize = 64;

const INITIAL_STATE: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

/// Left-rotation amount for each of the 64 rounds.
const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// `floor(abs(sin(i + 1)) * 2^32)` for each round `i`.
const ROUND_CONSTANTS: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Computes the MD5 digest of `input` and renders it as 32 lowercase hex
/// characters.
///
/// Each `char` contributes exactly one byte. Code points up to U+00FF map to
/// that byte; wider code points keep only their low byte, so non-Latin-1
/// input does not hash the same as its UTF-8 encoding would.
///
/// # Examples
/// ```
/// use registration_wall::digest::digest;
///
/// assert_eq!(digest("hello"), "5d41402abc4b2a76b9719d911017c592");
/// ```
pub fn digest(input: &str) -> String {
    let bytes: Vec<u8> = input.chars().map(|c| c as u32 as u8).collect();
    hex::encode(digest_bytes(&bytes))
}

fn digest_bytes(message: &[u8]) -> [u8; 16] {
    let mut state = INITIAL_STATE;

    let mut blocks = message.chunks_exact(BLOCK_LEN);
    for block in &mut blocks {
        compress(&mut state, block);
    }

    for block in pad(blocks.remainder(), message.len()).chunks_exact(BLOCK_LEN) {
        compress(&mut state, block);
    }

    let mut out = [0u8; 16];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Builds the final one or two blocks: the unprocessed tail, a single set bit,
/// zeros up to 56 mod 64, then the message length in bits (little-endian).
fn pad(tail: &[u8], message_len: usize) -> Vec<u8> {
    let bit_len = (message_len as u64).wrapping_mul(8);

    let mut padded = Vec::with_capacity(2 * BLOCK_LEN);
    padded.extend_from_slice(tail);
    padded.push(0x80);
    while padded.len() % BLOCK_LEN != BLOCK_LEN - 8 {
        padded.push(0);
    }
    padded.extend_from_slice(&bit_len.to_le_bytes());
    padded
}

fn compress(state: &mut [u32; 4], block: &[u8]) {
    let mut words = [0u32; 16];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let [mut a, mut b, mut c, mut d] = *state;

    for round in 0..64 {
        let (mixed, index) = match round / 16 {
            0 => ((b & c) | (!b & d), round),
            1 => ((b & d) | (c & !d), (5 * round + 1) % 16),
            2 => (b ^ c ^ d, (3 * round + 5) % 16),
            _ => (c ^ (b | !d), (7 * round) % 16),
        };

        let rotated = a
            .wrapping_add(mixed)
            .wrapping_add(ROUND_CONSTANTS[round])
            .wrapping_add(words[index])
            .rotate_left(SHIFTS[round]);

        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(rotated);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}
