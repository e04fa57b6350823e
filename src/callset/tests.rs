use crate::callset::CallSet;
use color_eyre::eyre::{Report, Result};
use indoc::indoc;

const HEADER: &str =
    "mutation\tstrain\tposition\tref\talt\talt_freq\tref_codon\talt_codon\tref_aa\talt_aa";

#[test]
fn optional_columns() -> Result<(), Report> {
    let table = format!(
        "{HEADER}\tgene\tao\tdp\tro\n{}",
        indoc! {"
            S:N501Y\tB.1.1.7\t23063\tA\tT\t0.98\tAAT\tTAT\tN\tY\tS\t98\t100\t2
            ORF8:Q27*\tB.1.1.7\t27972\tC\tT\t1.0\tCAA\tTAA\tQ\t*\t\t\t\t
        "}
    );
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("B.1.1.7.tsv");
    std::fs::write(&path, table)?;

    let call_set = CallSet::read(&path)?;
    assert_eq!(call_set.len(), 2);

    let first = &call_set.calls[0];
    assert_eq!(first.gene.as_deref(), Some("S"));
    assert_eq!((first.ao, first.dp, first.ro), (Some(98), Some(100), Some(2)));
    assert_eq!(first.nt_name, None);

    let second = &call_set.calls[1];
    assert_eq!(second.gene, None);
    assert_eq!(second.ao, None);

    assert_eq!(call_set.mutations().into_iter().collect::<Vec<_>>(), ["ORF8:Q27*", "S:N501Y"]);
    Ok(())
}

#[test]
fn unparsable_position() -> Result<(), Report> {
    let table = format!("{HEADER}\nS:N501Y\tB.1.1.7\tabc\tA\tT\t0.98\tAAT\tTAT\tN\tY\n");
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("B.1.1.7.tsv");
    std::fs::write(&path, table)?;

    let error = format!("{:?}", CallSet::read(&path).unwrap_err());
    assert!(error.contains("line 2"));
    assert!(error.contains("column \"position\""));
    assert!(error.contains("B.1.1.7.tsv"));
    Ok(())
}

#[test]
fn missing_required_column() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("B.1.1.7.tsv");
    std::fs::write(&path, "mutation\tstrain\nS:N501Y\tB.1.1.7\n")?;
    assert!(CallSet::read(&path).is_err());
    Ok(())
}

#[test]
fn empty_call_set() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("P.1.tsv");
    std::fs::write(&path, format!("{HEADER}\n"))?;

    let call_set = CallSet::read(&path)?;
    assert!(call_set.is_empty());
    assert_eq!(call_set.strain(), None);
    Ok(())
}
