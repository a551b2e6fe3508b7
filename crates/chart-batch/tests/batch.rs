// File: crates/chart-batch/tests/batch.rs
// Purpose: Batch export over CSV fixtures: outputs written, failures skipped, single-graph selection.

use std::path::Path;
use std::time::Duration;

use chart_batch::{load_sources, read_instructions, read_options, run_batch, BatchSettings, ExportFormat};

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn fixtures(root: &Path) {
    write(
        &root.join("data/wdi/datapoints.csv"),
        "geo,time,pop,lit\nswe,2000,8.8,0.99\nswe,2010,9.4,0.99\nswe,2005,,0.99\nnor,2000,4.5,0.98\n",
    );
    write(&root.join("data/wdi/concepts.csv"), "concept,name,name_short,format\npop,Population,pop,\nlit,Literacy,lit,share\n");
    write(
        &root.join("graph_list.csv"),
        "id,dataset,indicator,geo,title,time_interval,y_domain,multiplier\n\
         1,wdi,pop,swe,Sweden/population,,,\n\
         2,missing,pop,swe,Nowhere,,,\n\
         3,wdi,lit,nor,Literacy,1990-2020,\"[0, 1]\",\n\
         4,wdi,pop,swe,Bad domain,,\"[1,\",\n",
    );
    write(&root.join("options.csv"), "key,value\ny axis,on\narea, on \n");
}

fn settings(out: &Path) -> BatchSettings {
    BatchSettings { out_dir: out.to_path_buf(), delay: Duration::ZERO, ..BatchSettings::default() }
}

#[test]
fn exports_good_charts_and_skips_failures() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());

    let instructions = read_instructions(&dir.path().join("graph_list.csv")).unwrap();
    assert_eq!(instructions.len(), 4);
    assert_eq!(instructions[0].geo_id, "swe");
    let options = read_options(&dir.path().join("options.csv")).unwrap();
    assert_eq!(options.get("area"), Some("on"));

    let sources = load_sources(&dir.path().join("data"), instructions.iter().map(|i| i.dataset.as_str()));
    assert_eq!(sources.names().collect::<Vec<_>>(), ["wdi"]);

    let out = dir.path().join("out");
    let report = run_batch(&instructions, &sources, &options, &settings(&out));

    let names: Vec<String> = report
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["1 - Sweden_population.svg", "3 - Literacy.svg"]);
    let failed: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, ["2", "4"]);

    let svg = std::fs::read_to_string(out.join("1 - Sweden_population.svg")).unwrap();
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains(r#"class="area""#));
    assert!(svg.contains("style=\"fill:"));
}

#[test]
fn single_graph_selection() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());
    let instructions = read_instructions(&dir.path().join("graph_list.csv")).unwrap();
    let sources = load_sources(&dir.path().join("data"), ["wdi"]);

    let out = dir.path().join("out");
    let settings = BatchSettings { only: Some("3".into()), ..settings(&out) };
    let report = run_batch(&instructions, &sources, &Default::default(), &settings);
    assert_eq!(report.written.len(), 1);
    assert!(report.failed.is_empty());
    let svg = std::fs::read_to_string(&report.written[0]).unwrap();
    // Share-formatted callout for 0.98.
    assert!(svg.contains(">98%</text>"));
}

#[test]
fn png_export() {
    let dir = tempfile::tempdir().unwrap();
    fixtures(dir.path());
    let instructions = read_instructions(&dir.path().join("graph_list.csv")).unwrap();
    let sources = load_sources(&dir.path().join("data"), ["wdi"]);

    let out = dir.path().join("png");
    let settings = BatchSettings { format: ExportFormat::Png, scale: 1.0, only: Some("1".into()), ..settings(&out) };
    let report = run_batch(&instructions, &sources, &Default::default(), &settings);
    assert_eq!(report.written.len(), 1);
    let bytes = std::fs::read(&report.written[0]).unwrap();
    assert!(bytes.starts_with(&[137, 80, 78, 71]));
}

#[test]
fn missing_dataset_directory_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let sources = load_sources(dir.path(), ["absent"]);
    assert!(sources.get("absent").is_none());
}
