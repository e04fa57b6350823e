use crate::annotation::{Annotation, Annotations};
use color_eyre::eyre::{Report, Result};
use indoc::indoc;

const TABLE: &str = indoc! {"
    mutation\tfunction_category\tfunction_description\tsource\tcitation\tcomb_mutation
    S:N501Y\treceptor binding\tincreased ACE2 affinity\thttps://a.org\tA 2021\t
    S:E484K\tantibody escape\tbinds ACE2; reduces neutralization\thttps://b.org\tB 2021\t'S:N501Y', 'S:K417N'
    S:N501Y\ttransmissibility\t  increased transmission\thttps://c.org\tC 2021\t S:P681H
"};

#[test]
fn read_multiple_per_mutation() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("annotations.tsv");
    std::fs::write(&path, TABLE)?;

    let annotations = Annotations::read(&path)?;
    assert_eq!(annotations.rows.len(), 3);

    let categories: Vec<&str> =
        annotations.get("S:N501Y").map(|a| a.function_category.as_str()).collect();
    assert_eq!(categories, ["receptor binding", "transmissibility"]);

    // leading whitespace is trimmed
    let last = &annotations.rows[2];
    assert_eq!(last.function_description, "increased transmission");
    assert_eq!(last.comb_mutation, "S:P681H");

    assert!(annotations.contains("S:E484K"));
    assert!(!annotations.contains("ORF8:Q27*"));
    assert_eq!(annotations.get("ORF8:Q27*").count(), 0);
    Ok(())
}

#[test]
fn missing_column() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("annotations.tsv");
    std::fs::write(&path, "mutation\tfunction_category\nS:N501Y\tbinding\n")?;

    let error = Annotations::read(&path).unwrap_err();
    assert!(format!("{error:?}").contains("comb_mutation"));
    Ok(())
}

#[test]
fn from_rows() {
    let rows = vec![
        Annotation { mutation: "A".to_string(), ..Default::default() },
        Annotation { mutation: "B".to_string(), ..Default::default() },
    ];
    let annotations = Annotations::from_iter(rows);
    assert!(annotations.contains("A"));
    assert_eq!(annotations.get("B").count(), 1);
}
