//! User input messages.

use crate::cloud::{Dataset, Source};
use crate::view::DimensionSelection;
use std::str::FromStr;

/// Something the user did. Inputs are queued and applied between ticks by
/// the single owner of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Slider moved
    SetRadius(f64),
    /// Autoplay checkbox
    SetAutoplay(bool),
    /// Replace the whole dimension selection
    SetSelection(DimensionSelection),
    /// Toggle one of the show-H_k checkboxes
    ShowDimension(usize, bool),
    /// New dataset choice or upload
    Load(Source),
    /// End of session
    Quit,
}

/// Text commands, one per line:
///
/// ```text
/// radius 0.3 | r 0.3      move the slider
/// play | pause            autoplay on / off
/// show 0,2                select dimensions
/// h1 off | h2 on          toggle one dimension
/// load demo3d             switch dataset
/// quit | q
/// ```
impl FromStr for Input {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words
            .next()
            .ok_or_else(|| "empty command".to_string())?
            .to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments: {}", s.trim()));
        }
        let required = |what: &str| arg.ok_or_else(|| format!("{} needs {}", command, what));

        match command.as_str() {
            "radius" | "r" => {
                let value = required("a value")?;
                value
                    .parse::<f64>()
                    .map(Input::SetRadius)
                    .map_err(|_| format!("not a radius: {}", value))
            }
            "play" => Ok(Input::SetAutoplay(true)),
            "pause" | "stop" => Ok(Input::SetAutoplay(false)),
            "show" => required("a dimension list")?
                .parse()
                .map(Input::SetSelection),
            "load" => required("a dataset name")?
                .parse::<Dataset>()
                .map(|d| Input::Load(Source::Catalog(d)))
                .map_err(|e| e.to_string()),
            "quit" | "q" | "exit" => Ok(Input::Quit),
            h if h.starts_with('h') => {
                let dimension: usize = h[1..]
                    .parse()
                    .map_err(|_| format!("unknown command: {}", h))?;
                match required("on or off")? {
                    "on" => Ok(Input::ShowDimension(dimension, true)),
                    "off" => Ok(Input::ShowDimension(dimension, false)),
                    other => Err(format!("expected on or off, got {}", other)),
                }
            }
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("radius 0.3".parse(), Ok(Input::SetRadius(0.3)));
        assert_eq!("  R  0.5 ".parse(), Ok(Input::SetRadius(0.5)));
        assert_eq!("play".parse(), Ok(Input::SetAutoplay(true)));
        assert_eq!("pause".parse(), Ok(Input::SetAutoplay(false)));
        assert_eq!("h1 off".parse(), Ok(Input::ShowDimension(1, false)));
        assert_eq!("H2 on".parse(), Ok(Input::ShowDimension(2, true)));
        assert_eq!(
            "load demo3d.csv".parse(),
            Ok(Input::Load(Source::Catalog(Dataset::Demo3d)))
        );
        assert_eq!("q".parse(), Ok(Input::Quit));

        let show: Input = "show 0,2".parse().unwrap();
        assert_eq!(
            show,
            Input::SetSelection([0, 2].into_iter().collect())
        );
    }

    #[test]
    fn test_rejects_bad_commands() {
        for bad in ["", "radius", "radius wide", "h1 maybe", "hx on", "dance", "r 0.1 0.2", "load torus"] {
            assert!(bad.parse::<Input>().is_err(), "accepted {:?}", bad);
        }
    }
}
