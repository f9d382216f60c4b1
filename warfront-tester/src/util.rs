use anyhow::{Result, bail};
use warfront_ai::Personality;

pub const DEFAULT_SEED: u64 = 1337;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse CLI seed tokens, keeping first-seen order and dropping repeats.
///
/// Accepts decimal and `0x` hexadecimal values. Negative decimals fold to
/// their magnitude. An empty list falls back to [`DEFAULT_SEED`].
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    for token in tokens {
        let seed = if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            match u64::from_str_radix(hex, 16) {
                Ok(value) => value,
                Err(_) => bail!("Unrecognized seed token: {token}"),
            }
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

/// Resolve personality names; `all` expands to every archetype.
pub fn resolve_personalities(tokens: &[String]) -> Result<Vec<Personality>> {
    let mut out: Vec<Personality> = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            for personality in Personality::ALL {
                if !out.contains(personality) {
                    out.push(*personality);
                }
            }
            continue;
        }
        let personality = Personality::resolve(Some(token.as_str()))?;
        if !out.contains(&personality) {
            out.push(personality);
        }
    }
    if out.is_empty() {
        out.push(Personality::default());
    }
    Ok(out)
}
