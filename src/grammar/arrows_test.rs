use super::*;

fn verdict(segment: &str) -> Option<ArrowVerdict> {
    find_arrow(segment).map(|scan| scan.verdict)
}

// =============================================================================
// VALID FORMS
// =============================================================================

#[test]
fn all_valid_arrows_pass() {
    for segment in ["A->>B", "A-->>B", "A-xB", "A--xB", "A-)B", "A--)B"] {
        assert_eq!(verdict(segment), Some(ArrowVerdict::Valid), "{segment}");
    }
}

#[test]
fn arrow_with_spaces_around_it() {
    let scan = find_arrow("Alice ->> Bob").unwrap();
    assert_eq!(scan.verdict, ArrowVerdict::Valid);
    assert_eq!(scan.token, "->>");
}

#[test]
fn receiver_names_starting_with_head_letters() {
    // 'x' after a complete arrow is the receiver, not an extra head
    let scan = find_arrow("Alice->>xavier").unwrap();
    assert_eq!(scan.verdict, ArrowVerdict::Valid);
    assert_eq!(scan.token, "->>");

    let scan = find_arrow("Alice--)xena").unwrap();
    assert_eq!(scan.verdict, ArrowVerdict::Valid);
    assert_eq!(scan.token, "--)");

    let scan = find_arrow("A-xxray").unwrap();
    assert_eq!(scan.verdict, ArrowVerdict::Valid);
    assert_eq!(scan.token, "-x");
}

// =============================================================================
// INVALID FORMS
// =============================================================================

#[test]
fn single_angle_is_flagged() {
    assert_eq!(verdict("A->B"), Some(ArrowVerdict::SingleAngle));
    assert_eq!(verdict("A-->B"), Some(ArrowVerdict::SingleAngle));
}

#[test]
fn too_many_heads() {
    assert_eq!(verdict("A->>>B"), Some(ArrowVerdict::TooManyHeads));
    assert_eq!(verdict("A-->>>>B"), Some(ArrowVerdict::TooManyHeads));
}

#[test]
fn too_many_dashes() {
    assert_eq!(verdict("A--->B"), Some(ArrowVerdict::TooManyDashes));
    assert_eq!(verdict("A--->>B"), Some(ArrowVerdict::TooManyDashes));
}

#[test]
fn garbled_heads() {
    assert_eq!(verdict("A-x)B"), Some(ArrowVerdict::GarbledHeads));
    assert_eq!(verdict("A->xB"), Some(ArrowVerdict::GarbledHeads));
    assert_eq!(verdict("A-))B"), Some(ArrowVerdict::GarbledHeads));
}

#[test]
fn leftover_heads_cannot_start_a_receiver() {
    assert_eq!(verdict("A->>>xavier"), Some(ArrowVerdict::GarbledHeads));
    assert_eq!(verdict("A-x)ben"), Some(ArrowVerdict::GarbledHeads));
}

// =============================================================================
// SCANNING
// =============================================================================

#[test]
fn hyphenated_identifiers_are_skipped() {
    let scan = find_arrow("my-service->>db").unwrap();
    assert_eq!(scan.verdict, ArrowVerdict::Valid);
    assert_eq!(scan.token, "->>");
    assert_eq!(scan.column, 11);
}

#[test]
fn no_arrow_returns_none() {
    assert_eq!(find_arrow("participant Alice"), None);
    assert_eq!(find_arrow("a-b-c"), None);
    assert_eq!(find_arrow(""), None);
}

#[test]
fn first_token_wins() {
    let scan = find_arrow("A->B->>C").unwrap();
    assert_eq!(scan.verdict, ArrowVerdict::SingleAngle);
    assert_eq!(scan.token, "->");
}

#[test]
fn positions_are_char_and_byte_accurate() {
    let scan = find_arrow("AB-->>CD").unwrap();
    assert_eq!(scan.column, 3);
    assert_eq!(scan.start, 2);
    assert_eq!(scan.end, 6);
    assert_eq!(scan.token, "-->>");
}

#[test]
fn multibyte_sender_keeps_offsets_straight() {
    // 'Ω' is one char but two bytes
    let scan = find_arrow("Ω->>B").unwrap();
    assert_eq!(scan.column, 2);
    assert_eq!(scan.start, 2);
    assert_eq!(scan.token, "->>");
}

// =============================================================================
// REASONS
// =============================================================================

#[test]
fn reasons_name_the_valid_forms() {
    let single = find_arrow("A->B").unwrap();
    assert!(single.reason().contains("'->'"));
    assert!(single.reason().contains("->>"));

    let garbled = find_arrow("A-))B").unwrap();
    assert!(garbled.reason().contains("-->>"));
    assert!(garbled.reason().contains("--)"));
}
