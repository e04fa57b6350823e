use crate::config::{Config, GeneRange, Status, INTERGENIC};
use color_eyre::eyre::{Report, Result};
use std::str::FromStr;

#[test]
fn gene_boundaries_inclusive() {
    let config = Config::default();
    assert_eq!(config.gene(21563), "S");
    assert_eq!(config.gene(25384), "S");
    assert_eq!(config.gene(21556), INTERGENIC);
    assert_eq!(config.gene(30000), INTERGENIC);
}

#[test]
fn status_display() -> Result<(), Report> {
    assert_eq!(Status::Voc.to_string(), "VOC");
    assert_eq!(Status::from_str("VOI")?, Status::Voi);
    Ok(())
}

#[test]
fn read_partial_config() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "who_labels": { "BA.1": "Omicron" }, "variants_of_concern": ["Omicron"] }"#)?;

    let config = Config::read(&path)?;
    assert_eq!(config.status("BA.1"), Some(Status::Voc));
    assert_eq!(config.status("B.1.1.7"), None);
    // unspecified keys fall back to defaults
    assert_eq!(config.seqid, Config::default().seqid);
    assert_eq!(config.gene(28300), "N");
    Ok(())
}

#[test]
fn invalid_gene_range() -> Result<(), Report> {
    let mut config = Config::default();
    config.genes.insert("broken".to_string(), GeneRange { start: 100, end: 10 });
    assert!(config.validate().is_err());

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    config.write(&path)?;
    assert!(Config::read(&path).is_err());
    Ok(())
}

#[test]
fn write_default() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let args = crate::config::ConfigArgs { output: dir.path().join("config").join("config.json") };
    crate::config::write_default(&args)?;
    assert_eq!(Config::read(&args.output)?, Config::default());
    Ok(())
}
