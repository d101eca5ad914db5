use anyhow::{Context, bail};
use blockyard_input::Key;

/// One walk segment: hold `keys` for `frames` ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub keys: Vec<Key>,
    pub frames: u32,
}

/// Parse a walk script such as `w:30,wd:10,q:18,r:1`.
///
/// Each comma-separated segment is a run of key letters, a colon and a frame
/// count. A `-` in place of the letters idles for that many frames.
pub fn parse(script: &str) -> anyhow::Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for raw in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((letters, count)) = raw.split_once(':') else {
            bail!("segment {raw:?} is missing ':<frames>'");
        };
        let frames: u32 = count
            .trim()
            .parse()
            .with_context(|| format!("bad frame count in segment {raw:?}"))?;

        let mut keys = Vec::new();
        if letters.trim() != "-" {
            for c in letters.trim().chars() {
                let Some(key) = Key::from_char(c) else {
                    bail!("unknown key {c:?} in segment {raw:?}");
                };
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        segments.push(Segment { keys, frames });
    }
    Ok(segments)
}
