use approx::assert_relative_eq;
use dissolved_gas::{
    AppError, ColumnMap, Gas, SampleTable, Source, calc_all, calc_dissolved_conc, calc_sat,
    round_sig, saturation_concentration,
};

fn reference_table() -> SampleTable {
    let csv = "waterSampleID,gasVolume,waterVolume,barometricPressure,waterTemp,headspaceTemp,\
               concentrationCO2Gas,concentrationCO2Air,concentrationCH4Gas,concentrationCH4Air,\
               concentrationN2OGas,concentrationN2OAir\n\
               WS-1,20,40,93.62,15,15,1500,405,10,1.85,0.5,0.33\n\
               WS-2,20,40,93.62,15,NA,1500,NA,10,NA,0.5,NA\n";
    SampleTable::from_reader(csv.as_bytes(), b',').unwrap()
}

fn cell(t: &SampleTable, col: &str, row: usize) -> f64 {
    t.numeric(col).unwrap()[row].unwrap()
}

#[test]
fn reference_row_dissolved_concentrations() {
    let out = calc_dissolved_conc(reference_table(), &ColumnMap::default()).unwrap();
    assert_relative_eq!(cell(&out, "dissolvedCO2", 0), 8.27e-5, max_relative = 1e-12);
    assert_relative_eq!(cell(&out, "dissolvedCH4", 0), 1.76e-7, max_relative = 1e-12);
    assert_relative_eq!(cell(&out, "dissolvedN2O", 0), 1.87e-8, max_relative = 1e-12);
}

#[test]
fn missing_optional_inputs_match_explicit_defaults() {
    let out = calc_all(reference_table(), &ColumnMap::default()).unwrap();
    for col in [
        "dissolvedCO2",
        "dissolvedCH4",
        "dissolvedN2O",
        "satConcCO2",
        "CO2PercSat",
        "N2OPercSat",
    ] {
        assert_eq!(cell(&out, col, 0), cell(&out, col, 1), "column {col}");
    }
}

#[test]
fn outputs_are_rounded_to_three_significant_figures() {
    let out = calc_all(reference_table(), &ColumnMap::default()).unwrap();
    for gas in Gas::ALL {
        for col in [
            format!("dissolved{gas}"),
            format!("satConc{gas}"),
            format!("{gas}PercSat"),
        ] {
            let v = cell(&out, &col, 0);
            assert_eq!(round_sig(v, 3), v, "column {col} not rounded: {v}");
        }
    }
    assert_relative_eq!(cell(&out, "satConcCO2", 0), 1.65e-5, max_relative = 1e-12);
    assert_relative_eq!(cell(&out, "CO2PercSat", 0), 500.0, max_relative = 1e-12);
}

#[test]
fn pipeline_appends_columns_without_touching_existing_ones() {
    let input = reference_table();
    let out = calc_all(input.clone(), &ColumnMap::default()).unwrap();

    let before = input.column_names();
    let after = out.column_names();
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(
        &after[before.len()..],
        &[
            "dissolvedCO2",
            "dissolvedCH4",
            "dissolvedN2O",
            "satConcCO2",
            "satConcCH4",
            "satConcN2O",
            "CO2PercSat",
            "CH4PercSat",
            "N2OPercSat",
        ]
    );
    for name in before {
        assert_eq!(input.column(name), out.column(name), "column {name} changed");
    }
    assert_eq!(out.n_rows(), 2);
}

#[test]
fn equilibrium_sample_is_one_hundred_percent_saturated() {
    let sat = saturation_concentration(Gas::Ch4, 21.0, 1.85, 100.2);
    let table = SampleTable::new()
        .with_numeric("barometricPressure", vec![Some(100.2)])
        .unwrap()
        .with_numeric("waterTemp", vec![Some(21.0)])
        .unwrap()
        .with_numeric("dissolvedCO2", vec![Some(1e-5)])
        .unwrap()
        .with_numeric("dissolvedCH4", vec![Some(sat)])
        .unwrap()
        .with_numeric("dissolvedN2O", vec![Some(1e-8)])
        .unwrap();

    let out = calc_sat(table, &ColumnMap::default()).unwrap();
    assert_relative_eq!(cell(&out, "CH4PercSat", 0), 100.0, max_relative = 1e-12);
}

#[test]
fn missing_required_column_fails_whole_call() {
    let mut csv = String::from("gasVolume,barometricPressure,waterTemp,concentrationCO2Gas,concentrationCH4Gas,concentrationN2OGas\n");
    csv.push_str("20,93.62,15,1500,10,0.5\n20,93.62,15,1600,11,0.6\n");
    let table = SampleTable::from_reader(csv.as_bytes(), b',').unwrap();

    let err = calc_dissolved_conc(table.clone(), &ColumnMap::default()).unwrap_err();
    match err {
        AppError::MissingRequiredColumn { column, .. } => assert_eq!(column, "waterVolume"),
        other => panic!("unexpected error: {other:?}"),
    }

    let map = ColumnMap {
        vol_h2o: Source::Scalar(40.0),
        ..Default::default()
    };
    let out = calc_dissolved_conc(table, &map).unwrap();
    assert_relative_eq!(cell(&out, "dissolvedCO2", 0), 8.27e-5, max_relative = 1e-12);
}

#[test]
fn missing_equilibrated_gas_column_is_required_per_gas() {
    let table = SampleTable::new()
        .with_numeric("gasVolume", vec![Some(20.0)])
        .unwrap()
        .with_numeric("waterVolume", vec![Some(40.0)])
        .unwrap()
        .with_numeric("barometricPressure", vec![Some(93.62)])
        .unwrap()
        .with_numeric("waterTemp", vec![Some(15.0)])
        .unwrap()
        .with_numeric("concentrationCO2Gas", vec![Some(1500.0)])
        .unwrap()
        .with_numeric("concentrationCH4Gas", vec![Some(10.0)])
        .unwrap();

    let err = calc_dissolved_conc(table, &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, AppError::MissingRequiredColumn { .. }));
    assert!(err.to_string().contains("concentrationN2OGas"));
}

#[test]
fn bad_rows_do_not_affect_others() {
    let csv = "gasVolume,waterVolume,barometricPressure,waterTemp,concentrationCO2Gas,concentrationCH4Gas,concentrationN2OGas\n\
               20,0,93.62,15,1500,10,0.5\n\
               20,40,93.62,15,1500,10,0.5\n\
               20,40,,15,1500,10,0.5\n";
    let table = SampleTable::from_reader(csv.as_bytes(), b',').unwrap();
    let out = calc_all(table, &ColumnMap::default()).unwrap();

    let co2 = out.numeric("dissolvedCO2").unwrap();
    assert_eq!(co2[0], None);
    assert_relative_eq!(co2[1].unwrap(), 8.27e-5, max_relative = 1e-12);
    assert_eq!(co2[2], None);
    let pct = out.numeric("CO2PercSat").unwrap();
    assert_eq!(pct[0], None);
    assert!(pct[1].is_some());
    assert_eq!(pct[2], None);
}

#[test]
fn renamed_columns_via_json_map() {
    let csv = "vg,vw,p,t,co2,ch4,n2o\n20,40,93.62,15,1500,10,0.5\n";
    let table = SampleTable::from_reader(csv.as_bytes(), b',').unwrap();
    let map = ColumnMap::from_json_str(
        r#"{"volGas": "vg", "volH2O": "vw", "baro": "p", "waterTemp": "t",
            "eqCO2": "co2", "eqCH4": "ch4", "eqN2O": "n2o"}"#,
    )
    .unwrap();
    let out = calc_all(table, &map).unwrap();
    assert_relative_eq!(cell(&out, "dissolvedCO2", 0), 8.27e-5, max_relative = 1e-12);
    assert_relative_eq!(cell(&out, "CO2PercSat", 0), 500.0, max_relative = 1e-12);
}

#[test]
fn loads_table_lazily_from_path() {
    use std::io::Write as _;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let path = dir.path().join("sdg.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        "gasVolume,waterVolume,barometricPressure,waterTemp,concentrationCO2Gas,concentrationCH4Gas,concentrationN2OGas"
    )
    .unwrap();
    writeln!(f, "20,40,93.62,15,1500,10,0.5").unwrap();
    drop(f);

    let out = calc_dissolved_conc(path.as_path(), &ColumnMap::default()).unwrap();
    assert_relative_eq!(cell(&out, "dissolvedCO2", 0), 8.27e-5, max_relative = 1e-12);

    let missing = dir.path().join("nope.csv");
    let err = calc_dissolved_conc(missing.as_path(), &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, AppError::ReadFile { .. }));
}

#[test]
fn pipeline_output_keeps_input_cell_text() {
    let csv = "stationID,gasVolume,waterVolume,barometricPressure,waterTemp,\
               concentrationCO2Gas,concentrationCH4Gas,concentrationN2OGas\n\
               007,20,40,93.620,15.0,1500,10,0.5\n";
    let table = SampleTable::from_reader(csv.as_bytes(), b',').unwrap();
    let out = calc_all(table, &ColumnMap::default()).unwrap();

    let mut buf = Vec::new();
    out.write_csv(&mut buf, b',').unwrap();
    let written = String::from_utf8(buf).unwrap();
    let row = written.lines().nth(1).unwrap();
    assert!(
        row.starts_with("007,20,40,93.620,15.0,1500,10,0.5,0.0000827,"),
        "row rewritten: {row}"
    );
}
