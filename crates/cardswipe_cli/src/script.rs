//! Gesture scripts
//!
//! A script is a comma-separated list of steps:
//!
//! | step            | meaning                                    |
//! |-----------------|--------------------------------------------|
//! | `R` / `right`   | auto swipe the front card right            |
//! | `L` / `left`    | auto swipe the front card left             |
//! | `d:DX[:DY]`     | drag the front card by `(DX, DY)`          |
//! | `release`       | end the drag                               |
//! | `tick:MS`       | let `MS` milliseconds of frames run        |

use std::time::Duration;

use anyhow::{bail, Context, Result};
use cardswipe_core::Vec2;
use cardswipe_view::SwipeDirection;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Auto(SwipeDirection),
    Drag(Vec2),
    Release,
    Wait(Duration),
}

pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| parse_step(token).with_context(|| format!("bad script step `{token}`")))
        .collect()
}

fn parse_step(token: &str) -> Result<Step> {
    let mut parts = token.split(':');
    let head = parts.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    let step = match (head.as_str(), args.as_slice()) {
        ("r" | "right", []) => Step::Auto(SwipeDirection::Right),
        ("l" | "left", []) => Step::Auto(SwipeDirection::Left),
        ("release", []) => Step::Release,
        ("d" | "drag", [dx]) => Step::Drag(Vec2::new(number(dx)?, 0.0)),
        ("d" | "drag", [dx, dy]) => Step::Drag(Vec2::new(number(dx)?, number(dy)?)),
        ("tick" | "wait", [ms]) => {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("`{ms}` is not a number of milliseconds"))?;
            Step::Wait(Duration::from_millis(ms))
        }
        _ => bail!("expected R, L, d:DX[:DY], release or tick:MS"),
    };
    Ok(step)
}

fn number(text: &str) -> Result<f32> {
    let value: f32 = text
        .trim()
        .parse()
        .with_context(|| format!("`{text}` is not a number"))?;
    if !value.is_finite() {
        bail!("`{text}` is not finite");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_script() {
        let steps = parse_script("R, l, d:300, d:-20.5:4, release, tick:100").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Auto(SwipeDirection::Right),
                Step::Auto(SwipeDirection::Left),
                Step::Drag(Vec2::new(300.0, 0.0)),
                Step::Drag(Vec2::new(-20.5, 4.0)),
                Step::Release,
                Step::Wait(Duration::from_millis(100)),
            ]
        );
    }

    #[test]
    fn test_empty_tokens_are_skipped() {
        assert_eq!(parse_script(" ,R,, ").unwrap().len(), 1);
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_unknown_steps() {
        assert!(parse_script("jump").is_err());
        assert!(parse_script("d:abc").is_err());
        assert!(parse_script("d:inf").is_err());
        assert!(parse_script("tick:-5").is_err());
        assert!(parse_script("release:1").is_err());
    }

    #[test]
    fn test_error_names_the_step() {
        let err = parse_script("R,d:x").unwrap_err();
        assert!(err.to_string().contains("d:x"));
    }
}
