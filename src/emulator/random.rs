use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Somewhere to get the random bytes used by CXNN from.
pub trait Entropy {
    fn next_byte(&mut self) -> u8;
}

impl<E: Entropy + ?Sized> Entropy for Box<E> {
    fn next_byte(&mut self) -> u8 {
        (**self).next_byte()
    }
}

/// Uses the thread local generator from `rand`.
pub struct SystemEntropy;

impl Entropy for SystemEntropy {
    fn next_byte(&mut self) -> u8 {
        rand::random::<u8>()
    }
}

/// A reproducible stream of bytes.
pub struct SeededEntropy(StdRng);

impl SeededEntropy {
    pub fn new(seed: u64) -> SeededEntropy {
        SeededEntropy(StdRng::seed_from_u64(seed))
    }
}

impl Entropy for SeededEntropy {
    fn next_byte(&mut self) -> u8 {
        self.0.gen::<u8>()
    }
}

/// Cycles through a fixed list of bytes. Yields zeros if the list is empty.
pub struct FixedEntropy {
    bytes: Vec<u8>,
    position: usize,
}

impl FixedEntropy {
    pub fn new(bytes: &[u8]) -> FixedEntropy {
        FixedEntropy {
            bytes: bytes.to_vec(),
            position: 0,
        }
    }
}

impl Entropy for FixedEntropy {
    fn next_byte(&mut self) -> u8 {
        if self.bytes.is_empty() {
            return 0;
        }
        let byte = self.bytes[self.position];
        self.position = (self.position + 1) % self.bytes.len();
        byte
    }
}
