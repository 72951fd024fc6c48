use anyhow::{Context, Result};

/// Seed used when no tokens are supplied.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed arguments into session seeds.
///
/// Accepts decimal (negative values use their magnitude) and `0x`-prefixed
/// hexadecimal. Duplicates are dropped, first occurrence wins.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let seed = parse_seed(token).with_context(|| format!("Unrecognized seed token: {token}"))?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return Ok(u64::from_str_radix(&hex.replace('_', ""), 16)?);
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    Ok(token.parse::<u64>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_decimal_negative_and_hex() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xC0_FFEE", "18446744073709551615"]))
            .unwrap();
        assert_eq!(seeds, vec![42, 7, 0x00C0_FFEE, u64::MAX]);
    }

    #[test]
    fn duplicates_collapse_and_empty_defaults() {
        assert_eq!(
            resolve_seed_inputs(&tokens(&["5", "0x5", "5"])).unwrap(),
            vec![5]
        );
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_words() {
        let err = resolve_seed_inputs(&tokens(&["tharsis"])).unwrap_err();
        assert!(err.to_string().contains("tharsis"));
    }
}
