/// Concatenates a byte slice with any number of others, in order, into a
/// fresh allocation. With no extra slices this is just an owned copy of
/// `first`.
pub fn concat(first: &[u8], rest: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(first.len() + rest.iter().map(|b| b.len()).sum::<usize>());
    out.extend_from_slice(first);
    for bytes in rest {
        out.extend_from_slice(bytes);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_in_order() {
        let out = concat(&[0x12], &[&[0x34, 0x56], &[0x78]]);
        assert_eq!(out, [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(out.len(), 1 + 2 + 1);
    }

    #[test]
    fn concat_nothing_is_a_copy() {
        assert_eq!(concat(&[0x90, 0x00], &[]), [0x90, 0x00]);
        assert_eq!(concat(&[], &[]), [] as [u8; 0]);
    }

    #[test]
    fn concat_empty_pieces() {
        assert_eq!(concat(&[], &[&[0x01], &[], &[0x02]]), [0x01, 0x02]);
    }
}
