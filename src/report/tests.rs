use crate::merge::Diagnostics;
use crate::report::{Reports, MISSING_CLADE_DEFINING, UNANNOTATED};
use color_eyre::eyre::{Report, Result};

#[test]
fn one_row_per_strain() -> Result<(), Report> {
    let mut reports = Reports::new();
    reports.add(&Diagnostics {
        strain: "B.1.1.7".to_string(),
        unannotated: vec!["ORF8:Q27*".to_string(), "S:A570D".to_string()],
        missing_clade_defining: vec![],
    })?;
    reports.add(&Diagnostics { strain: "P.1".to_string(), ..Default::default() })?;

    let dir = tempfile::tempdir()?;
    reports.write(&dir.path())?;

    let observed = std::fs::read_to_string(dir.path().join(UNANNOTATED))?;
    let expected = "strain\tcount\tmutations\nB.1.1.7\t2\tORF8:Q27*,S:A570D\nP.1\t0\t\n";
    assert_eq!(expected, observed);

    let observed = std::fs::read_to_string(dir.path().join(MISSING_CLADE_DEFINING))?;
    let expected = "strain\tcount\tmutations\nB.1.1.7\t0\t\nP.1\t0\t\n";
    assert_eq!(expected, observed);
    Ok(())
}
