// Shared fixtures for integration tests

#![allow(dead_code)]

use std::fmt::Write;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "gender,race/ethnicity,parental level of education,lunch,test preparation course,math score,reading score,writing score";

const GROUPS: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];
const EDUCATION: [&str; 6] = [
    "some high school",
    "high school",
    "some college",
    "associate's degree",
    "bachelor's degree",
    "master's degree",
];

/// Deterministic dataset in the StudentsPerformance layout
///
/// math = 52 + 5*male + 2*group_index + 1.5*education_index
///        + 11*standard_lunch - 6*no_prep + noise in [-5, 5]
pub fn synthetic_csv(rows: usize) -> String {
    let mut text = String::from(HEADER);
    for i in 0..rows {
        let male = i % 2 == 1;
        let group = (i / 2) % GROUPS.len();
        let education = (i / 7) % EDUCATION.len();
        let standard = (i / 3) % 2 == 0;
        let no_prep = (i / 5) % 3 != 0;
        let noise = ((i * 37) % 11) as f64 - 5.0;

        let mut math = 52.0 + 2.0 * group as f64 + 1.5 * education as f64 + noise;
        if male {
            math += 5.0;
        }
        if standard {
            math += 11.0;
        }
        if no_prep {
            math -= 6.0;
        }

        let _ = write!(
            text,
            "\n{},{},{},{},{},{},{},{}",
            if male { "male" } else { "female" },
            GROUPS[group],
            EDUCATION[education],
            if standard { "standard" } else { "free/reduced" },
            if no_prep { "none" } else { "completed" },
            math,
            math + 3.0,
            math + 1.0
        );
    }
    text
}

/// Write the synthetic dataset into `dir` and return its path
pub fn write_dataset(dir: &Path, rows: usize) -> PathBuf {
    let path = dir.join("StudentsPerformance.csv");
    std::fs::write(&path, synthetic_csv(rows)).expect("write dataset");
    path
}
