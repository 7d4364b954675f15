static ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Generate a new invite code
///
/// Two independently randomized alphanumeric segments behind a fixed
/// prefix, e.g. `invite-x7k2m-9qp4z`. Uniqueness is not re-checked; the
/// store's unique index on `code` is the backstop.
pub fn generate_invite_code() -> String {
    format!("invite-{}-{}", nanoid!(5, &ALPHABET), nanoid!(5, &ALPHABET))
}

#[cfg(test)]
mod tests {
    use super::generate_invite_code;

    #[test]
    fn it_generates_recognisable_codes() {
        let code = generate_invite_code();
        let mut parts = code.split('-');

        assert_eq!(parts.next(), Some("invite"));
        assert_eq!(parts.next().map(str::len), Some(5));
        assert_eq!(parts.next().map(str::len), Some(5));
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn it_generates_distinct_codes() {
        assert_ne!(generate_invite_code(), generate_invite_code());
    }
}
