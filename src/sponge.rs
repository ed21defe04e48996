//! Fixed-state sponge used for every KodeChain digest.
//!
//! The node derives addresses and function selectors with this construction,
//! so its output must match byte for byte. It is not a vetted cryptographic
//! hash; treat it as a wire-compatibility primitive.
//!
//! The state is 32 bytes with a single cursor shared by absorb and squeeze.
//! [`SpongeState::permute`] updates the state in place, left to right, so later
//! positions read neighbours that were already rewritten earlier in the same pass.

/// Width of the sponge state and of every digest, in bytes.
pub const STATE_BYTES: usize = 32;

/// Mutable sponge state. One instance per digest; never shared.
#[derive(Debug, Clone, Default)]
pub struct SpongeState {
    state: [u8; STATE_BYTES],
    cursor: usize,
}

impl SpongeState {
    /// Fresh all-zero state with the cursor at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// XOR `input` into the state byte by byte, permuting each time the cursor wraps.
    pub fn absorb(&mut self, input: &[u8]) {
        for &byte in input {
            self.state[self.cursor] ^= byte;
            self.cursor = (self.cursor + 1) % STATE_BYTES;
            if self.cursor == 0 {
                self.permute();
            }
        }
    }

    /// One in-place mixing pass over the whole state.
    ///
    /// Must not be rewritten as read-all-then-write-all: indices that wrap
    /// around (`i + 1`, `i + 7` past 31) read values already updated in this pass.
    pub fn permute(&mut self) {
        for i in 0..STATE_BYTES {
            let mixed = self.state[i]
                ^ self.state[(i + 1) % STATE_BYTES]
                ^ self.state[(i + 7) % STATE_BYTES];
            self.state[i] = mixed.rotate_left(1);
        }
    }

    /// Emit `length` bytes, permuting before any byte read at cursor 0.
    pub fn squeeze(&mut self, length: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(length);
        for _ in 0..length {
            if self.cursor == 0 {
                self.permute();
            }
            out.push(self.state[self.cursor]);
            self.cursor = (self.cursor + 1) % STATE_BYTES;
        }
        out
    }

    /// Squeeze exactly one digest worth of bytes.
    pub fn squeeze_digest(&mut self) -> [u8; STATE_BYTES] {
        let mut out = [0u8; STATE_BYTES];
        for slot in out.iter_mut() {
            if self.cursor == 0 {
                self.permute();
            }
            *slot = self.state[self.cursor];
            self.cursor = (self.cursor + 1) % STATE_BYTES;
        }
        out
    }

    /// Current cursor position in `[0, 32)`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Read-only view of the raw state.
    pub fn state(&self) -> &[u8; STATE_BYTES] {
        &self.state
    }

    #[cfg(test)]
    fn from_raw(state: [u8; STATE_BYTES]) -> Self {
        Self { state, cursor: 0 }
    }
}
