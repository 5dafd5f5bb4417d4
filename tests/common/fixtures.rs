/// JSON dump fixtures, in the promdump format.
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes dumps into a temporary directory that lives as long as this value.
pub struct DumpDir {
    dir: TempDir,
}

impl DumpDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }
}

/// One sample stream: `metric` labels and `(seconds, value)` pairs.
pub fn stream(metric: &[(&str, &str)], values: &[(f64, &str)]) -> String {
    let metric = metric
        .iter()
        .map(|(k, v)| format!("\"{}\": \"{}\"", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    let values = values
        .iter()
        .map(|(ts, v)| format!("[{}, \"{}\"]", ts, v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{\"metric\": {{{}}}, \"values\": [{}]}}", metric, values)
}

pub fn dump(streams: &[String]) -> String {
    format!("[{}]", streams.join(",\n"))
}

/// Series A at 0s, 30s, 90s and series B at 45s.
pub fn two_series_dump() -> String {
    dump(&[
        stream(
            &[("__name__", "a"), ("job", "replay")],
            &[(0.0, "1"), (30.0, "2"), (90.0, "3")],
        ),
        stream(&[("__name__", "b"), ("job", "replay")], &[(45.0, "4")]),
    ])
}

/// One series with one sample in each of `minutes` consecutive minutes.
pub fn one_sample_per_minute(name: &str, first_minute: usize, minutes: usize) -> String {
    let values: Vec<(f64, String)> = (first_minute..first_minute + minutes)
        .map(|m| ((m * 60 + 1) as f64, m.to_string()))
        .collect();
    let values: Vec<(f64, &str)> = values.iter().map(|(ts, v)| (*ts, v.as_str())).collect();
    dump(&[stream(&[("__name__", name)], &values)])
}
