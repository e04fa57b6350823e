use crate::report::UNANNOTATED;
use crate::run::{run, RunArgs};
use color_eyre::eyre::{Report, Result};
use indoc::indoc;
use std::io::Write;
use std::path::{Path, PathBuf};

const ANNOTATIONS: &str = indoc! {"
    mutation\tfunction_category\tfunction_description\tsource\tcitation\tcomb_mutation
    S:N501Y\treceptor binding\tincreased ACE2 affinity\thttps://example.org\tDoe 2021\t
    S:E484K\tantibody escape\treduced neutralization; by sera\thttps://example.org\tRoe 2021\t['S:K417N']
    S:K417N\tantibody escape\t\thttps://example.org\tRoe 2021\t['S:E484K']
"};

const CLADES: &str = indoc! {"
    strain\tmutation
    B.1.1.7\tS:N501Y
    B.1.1.7\tS:P681H
    B.1.351\tS:K417N
"};

const ALPHA: &str = indoc! {"
    mutation\tstrain\tposition\tref\talt\talt_freq\tref_codon\talt_codon\tref_aa\talt_aa
    S:N501Y\tB.1.1.7\t23063\tA\tT\t0.98\tAAT\tTAT\tN\tY
    S:E484K\tB.1.1.7\t23012\tG\tA\t0.5\tGAA\tAAA\tE\tK
    ORF8:Q27*\tB.1.1.7\t27972\tC\tT\t1.0\tCAA\tTAA\tQ\t*
"};

const BETA: &str = indoc! {"
    mutation\tstrain\tposition\tref\talt\talt_freq\tref_codon\talt_codon\tref_aa\talt_aa
    S:K417N\tB.1.351\t22813\tG\tT\t0.99\tAAG\tAAT\tK\tN
    S:E484K\tB.1.351\t23012\tG\tA\t0.97\tGAA\tAAA\tE\tK
    S:N501Y\tB.1.351\t23063\tA\tT\t0.99\tAAT\tTAT\tN\tY
"};

fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, Report> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn args(dir: &Path, inputs: Vec<PathBuf>) -> Result<RunArgs, Report> {
    Ok(RunArgs {
        annotations: write(dir, "annotations.tsv", ANNOTATIONS)?,
        clade_defining: Some(write(dir, "clades.tsv", CLADES)?),
        output_dir: dir.join("output"),
        threads: 2,
        inputs,
        ..Default::default()
    })
}

#[test]
fn batch() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let alpha = write(dir.path(), "B.1.1.7.tsv", ALPHA)?;
    let beta = write(dir.path(), "B.1.351.tsv", BETA)?;
    let args = args(dir.path(), vec![alpha, beta])?;

    let summary = run(&args)?;
    summary.ensure_success()?;

    let strains = summary.files.iter().map(|f| f.strain.as_str()).collect::<Vec<_>>();
    assert_eq!(strains, ["B.1.1.7", "B.1.351"]);
    // S:E484K needs S:K417N, absent from the alpha call set
    assert_eq!(summary.files[0].output_rows, 2);
    assert_eq!(summary.files[0].groups_dropped, 1);
    assert_eq!(summary.files[1].output_rows, 3);
    assert_eq!(summary.unique_mutations(), 4);

    let gvf = std::fs::read_to_string(dir.path().join("output").join("B.1.351.merged.gvf"))?;
    let rows = gvf.lines().skip(4).collect::<Vec<_>>();
    assert_eq!(rows.len(), 3);
    // K417N and E484K list each other and share an id
    assert!(rows[0].contains("ID=ID_0;Name=S:K417N;"));
    assert!(rows[1].contains("ID=ID_0;Name=S:E484K;"));
    assert!(rows[1].contains("reduced neutralization: by sera"));
    assert!(rows[0].contains("who_label=Beta;status=VOC;"));
    assert!(rows[0].contains("clade_defining=True;"));
    assert!(rows[2].contains("ID=ID_1;Name=S:N501Y;"));

    let report = std::fs::read_to_string(dir.path().join("output").join(UNANNOTATED))?;
    let expected = "strain\tcount\tmutations\nB.1.1.7\t1\tORF8:Q27*\nB.1.351\t0\t\n";
    assert_eq!(expected, report);

    let table = summary.to_table().to_string();
    assert!(table.contains("B.1.351"));
    Ok(())
}

#[test]
fn malformed_file_continues() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let missing_column = write(dir.path(), "missing_column.tsv", "mutation\tstrain\nS:N501Y\tB.1.1.7\n")?;
    let bad_position = write(dir.path(), "bad_position.tsv", &ALPHA.replacen("23063", "23O63", 1))?;
    let beta = write(dir.path(), "B.1.351.tsv", BETA)?;
    let args = args(dir.path(), vec![missing_column.clone(), beta, bad_position.clone()])?;

    let summary = run(&args)?;
    assert_eq!(summary.len(), 3);
    assert_eq!(summary.files.len(), 1);
    assert!(summary.ensure_success().is_err());

    let (path, error) = &summary.failed[0];
    assert_eq!(path, &missing_column);
    let error = format!("{error:?}");
    assert!(error.contains("missing_column.tsv"));
    assert!(error.contains("position"));

    let (path, error) = &summary.failed[1];
    assert_eq!(path, &bad_position);
    let error = format!("{error:?}");
    assert!(error.contains("bad_position.tsv"));
    assert!(error.contains("line 2"));
    assert!(error.contains("column \"position\""));

    let output = dir.path().join("output");
    assert!(output.join("B.1.351.merged.gvf").exists());
    assert!(!output.join("missing_column.merged.gvf").exists());
    assert!(!output.join("bad_position.merged.gvf").exists());
    let report = std::fs::read_to_string(output.join(UNANNOTATED))?;
    assert_eq!(report.lines().count(), 2);
    Ok(())
}

#[test]
fn zst_input() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("B.1.1.7.tsv.zst");
    let mut encoder = zstd::stream::write::Encoder::new(std::fs::File::create(&path)?, 0)?;
    encoder.write_all(ALPHA.as_bytes())?;
    encoder.finish()?;

    let args = args(dir.path(), vec![path])?;
    let summary = run(&args)?;
    assert_eq!(summary.files[0].input_rows, 3);
    assert!(dir.path().join("output").join("B.1.1.7.merged.gvf").exists());
    Ok(())
}

#[test]
fn strain_override() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let alpha = write(dir.path(), "alpha_calls.tsv", ALPHA)?;
    let mut args = args(dir.path(), vec![alpha.clone()])?;
    args.strain = Some("B.1.351".to_string());

    let summary = run(&args)?;
    // the calls are B.1.1.7, so none are clade-defining for B.1.351
    let gvf = std::fs::read_to_string(&summary.files[0].output)?;
    assert!(!gvf.contains("clade_defining=True"));
    assert_eq!(summary.files[0].diagnostics.missing_clade_defining, ["S:K417N"]);

    args.inputs.push(alpha);
    assert!(run(&args).is_err());
    Ok(())
}

#[test]
fn missing_annotations_fatal() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let alpha = write(dir.path(), "B.1.1.7.tsv", ALPHA)?;
    let mut args = args(dir.path(), vec![alpha])?;
    args.annotations = dir.path().join("missing.tsv");

    assert!(run(&args).is_err());
    assert!(!dir.path().join("output").exists());
    Ok(())
}
