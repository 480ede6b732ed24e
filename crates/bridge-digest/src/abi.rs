//! A minimal Ethereum ABI head+tail encoder for the fixed set of tuple shapes
//! the digest codec needs: a run of `bytes32`/`uint256`/`address` static
//! words interspersed with `address[]`/`uint256[]` dynamic arrays.

/// One top-level element of an ABI tuple.
pub enum Slot {
	/// A value that is encoded inline in the head, in place.
	Static([u8; 32]),
	/// An array; each element is already encoded to its 32-byte word. The
	/// head carries an offset, the length and elements live in the tail.
	Dynamic(Vec<[u8; 32]>),
}

pub struct AbiEncoder;

impl AbiEncoder {
	/// Encodes `slots` following Solidity's head+tail ABI layout: one head
	/// word per top-level slot (the value itself, or an offset into the
	/// tail), followed by the tail data for every dynamic slot in order.
	pub fn encode_tuple(slots: &[Slot]) -> Vec<u8> {
		let head_len = 32 * slots.len();

		let tails: Vec<Vec<u8>> = slots
			.iter()
			.map(|slot| match slot {
				Slot::Static(_) => Vec::new(),
				Slot::Dynamic(words) => {
					let mut tail = Vec::with_capacity(32 * (1 + words.len()));
					tail.extend_from_slice(&u256_word(words.len() as u64));
					for word in words {
						tail.extend_from_slice(word);
					}
					tail
				}
			})
			.collect();

		let mut head = Vec::with_capacity(head_len);
		let mut tail_offset = head_len;
		for (slot, tail) in slots.iter().zip(tails.iter()) {
			match slot {
				Slot::Static(word) => head.extend_from_slice(word),
				Slot::Dynamic(_) => {
					head.extend_from_slice(&u256_word(tail_offset as u64));
					tail_offset += tail.len();
				}
			}
		}

		for tail in &tails {
			head.extend_from_slice(tail);
		}
		head
	}
}

fn u256_word(v: u64) -> [u8; 32] {
	let mut word = [0u8; 32];
	word[24..].copy_from_slice(&v.to_be_bytes());
	word
}
