//! Brazilian identity document validators.
//!
//! Each validator takes raw text (typed by an operator or read by OCR),
//! keeps only the ASCII digits (an RG may also end in an `X` check
//! character) and either returns the canonically punctuated number or
//! `None`. Rejection is the common case for noisy
//! OCR output, so it is never reported as an error.

/// Keep only ASCII digits, in order.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a CPF (individual taxpayer number) and format it as `XXX.XXX.XXX-XX`.
///
/// Requires exactly 11 digits, not all identical, with both check digits
/// matching the mod-11 weighted sums.
pub fn validate_cpf(raw: &str) -> Option<String> {
    let digits = digit_values(raw);
    if digits.len() != 11 {
        return None;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return None;
    }

    if cpf_check_digit(&digits[..9]) != digits[9] {
        return None;
    }
    if cpf_check_digit(&digits[..10]) != digits[10] {
        return None;
    }

    Some(group(&digits, &[3, 3, 3, 2]))
}

/// Validate an RG (state identity card) number.
///
/// RG has no national checksum, so this is a length plausibility gate
/// (8 to 10 digits). The last group is the check run; the leading group
/// absorbs the length difference:
///
/// | digits | format          |
/// |--------|-----------------|
/// | 8      | `X.XXX.XXX-X`   |
/// | 9      | `XX.XXX.XXX-X`  |
/// | 10     | `XX.XXX.XXX-XX` |
///
/// Some states print `X` as the final check character. A trailing `X` is
/// kept in place of the last digit and counts towards the length.
pub fn validate_rg(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (body, x_check) = match trimmed.strip_suffix(|c| c == 'X' || c == 'x') {
        Some(body) => (body, true),
        None => (trimmed, false),
    };

    let mut digits = digit_values(body);
    if x_check {
        // placeholder for the check character, swapped back after grouping
        digits.push(0);
    }
    let layout: &[usize] = match digits.len() {
        8 => &[1, 3, 3, 1],
        9 => &[2, 3, 3, 1],
        10 => &[2, 3, 3, 2],
        _ => return None,
    };

    let mut formatted = group(&digits, layout);
    if x_check {
        formatted.pop();
        formatted.push('X');
    }
    Some(formatted)
}

/// Validate a CNH (driver's license) number and format it as `XXX.XXX.XXX-XX`.
///
/// Length gate only: exactly 11 digits, no checksum.
pub fn validate_cnh(raw: &str) -> Option<String> {
    let digits = digit_values(raw);
    if digits.len() != 11 {
        return None;
    }
    Some(group(&digits, &[3, 3, 3, 2]))
}

fn digit_values(raw: &str) -> Vec<u32> {
    raw.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Weighted sum with weights `len+1 .. 2`, then `sum * 10 mod 11` (10 → 0).
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest >= 10 {
        0
    } else {
        rest
    }
}

/// Join digit runs of the given sizes: dots between runs, a dash before the last.
fn group(digits: &[u32], sizes: &[usize]) -> String {
    let mut out = String::with_capacity(digits.len() + sizes.len());
    let mut offset = 0;
    for (idx, size) in sizes.iter().enumerate() {
        if idx == sizes.len() - 1 {
            out.push('-');
        } else if idx > 0 {
            out.push('.');
        }
        for d in &digits[offset..offset + size] {
            if let Some(c) = char::from_digit(*d, 10) {
                out.push(c);
            }
        }
        offset += size;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_strips_punctuation_and_noise() {
        assert_eq!(digits_only("111.444.777-35"), "11144477735");
        assert_eq!(digits_only(" CPF: 111 444 777/35 "), "11144477735");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn cpf_reference_number_accepted() {
        assert_eq!(validate_cpf("111.444.777-35").as_deref(), Some("111.444.777-35"));
        assert_eq!(validate_cpf("11144477735").as_deref(), Some("111.444.777-35"));
    }

    #[test]
    fn cpf_accepts_other_valid_numbers() {
        assert_eq!(validate_cpf("529.982.247-25").as_deref(), Some("529.982.247-25"));
        assert_eq!(validate_cpf("390.533.447-05").as_deref(), Some("390.533.447-05"));
    }

    #[test]
    fn cpf_wrong_check_digit_rejected() {
        assert_eq!(validate_cpf("111.444.777-36"), None);
        assert_eq!(validate_cpf("111.444.777-45"), None);
    }

    #[test]
    fn cpf_wrong_length_rejected() {
        assert_eq!(validate_cpf("123"), None);
        assert_eq!(validate_cpf(""), None);
        assert_eq!(validate_cpf("111.444.777-351"), None);
    }

    #[test]
    fn cpf_repeated_digits_rejected() {
        for d in 0..=9 {
            let raw: String = std::iter::repeat(char::from_digit(d, 10).unwrap())
                .take(11)
                .collect();
            assert_eq!(validate_cpf(&raw), None, "{raw} should be rejected");
        }
    }

    #[test]
    fn cpf_check_digit_ten_maps_to_zero() {
        // 390.533.447: first sum gives rest 10, so the first check digit is 0
        assert_eq!(cpf_check_digit(&[3, 9, 0, 5, 3, 3, 4, 4, 7]), 0);
    }

    #[test]
    fn cpf_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not part of a CPF
        assert_eq!(validate_cpf("١١١.444.777-35"), None);
    }

    #[test]
    fn rg_nine_digits_formatted() {
        assert_eq!(validate_rg("123456789").as_deref(), Some("12.345.678-9"));
        assert_eq!(validate_rg("12.345.678-9").as_deref(), Some("12.345.678-9"));
    }

    #[test]
    fn rg_eight_and_ten_digits_formatted() {
        assert_eq!(validate_rg("12345678").as_deref(), Some("1.234.567-8"));
        assert_eq!(validate_rg("1234567890").as_deref(), Some("12.345.678-90"));
    }

    #[test]
    fn rg_outside_length_gate_rejected() {
        assert_eq!(validate_rg("1234567"), None);
        assert_eq!(validate_rg("12345678901"), None);
    }

    #[test]
    fn rg_x_check_character_kept() {
        assert_eq!(validate_rg("12.345.678-X").as_deref(), Some("12.345.678-X"));
        assert_eq!(validate_rg("12345678x").as_deref(), Some("12.345.678-X"));
        assert_eq!(validate_rg("1.234.567-X").as_deref(), Some("1.234.567-X"));
        // the X never shifts the digits into a different number
        assert_ne!(validate_rg("12.345.678-X").as_deref(), Some("1.234.567-8"));
    }

    #[test]
    fn rg_x_counts_towards_length_gate() {
        assert_eq!(validate_rg("123456X"), None);
        assert_eq!(validate_rg("1234567890X"), None);
        assert_eq!(validate_rg("X"), None);
    }

    #[test]
    fn cnh_eleven_digits_accepted_without_checksum() {
        assert_eq!(validate_cnh("12345678901").as_deref(), Some("123.456.789-01"));
        assert_eq!(validate_cnh("00000000000").as_deref(), Some("000.000.000-00"));
    }

    #[test]
    fn cnh_wrong_length_rejected() {
        assert_eq!(validate_cnh("1234567890"), None);
        assert_eq!(validate_cnh("123456789012"), None);
    }

    #[test]
    fn formatted_output_revalidates_to_itself() {
        let cpf = validate_cpf("52998224725").unwrap();
        assert_eq!(validate_cpf(&cpf).as_deref(), Some(cpf.as_str()));

        for raw in ["12345678", "123456789", "1234567890", "12345678X"] {
            let rg = validate_rg(raw).unwrap();
            assert_eq!(validate_rg(&rg).as_deref(), Some(rg.as_str()));
        }

        let cnh = validate_cnh("98765432100").unwrap();
        assert_eq!(validate_cnh(&cnh).as_deref(), Some(cnh.as_str()));
    }

    #[test]
    fn validators_are_deterministic() {
        for raw in ["111.444.777-35", "111.444.777-36", "123456789", "x"] {
            assert_eq!(validate_cpf(raw), validate_cpf(raw));
            assert_eq!(validate_rg(raw), validate_rg(raw));
            assert_eq!(validate_cnh(raw), validate_cnh(raw));
        }
    }
}
