use rust_xlsxwriter::Workbook;
use salesboard_core::{DashboardConfig, Pipeline};
use salesboard_viz::{DashboardSpec, Panel};

fn workbook(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            match value.parse::<f64>() {
                Ok(n) => sheet.write_number(r as u32 + 1, col as u16, n).unwrap(),
                Err(_) => sheet.write_string(r as u32 + 1, col as u16, *value).unwrap(),
            };
        }
    }
    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_spec_from_uploaded_workbook() {
    let bytes = workbook(
        &[
            "Date",
            "Product line",
            "Total",
            "Quantity",
            "cogs",
            "Rating",
            "City",
            "Payment",
        ],
        &[
            &[
                "1/5/2019",
                "Health and beauty",
                "548.9715",
                "7",
                "522.83",
                "9.1",
                "Yangon",
                "Ewallet",
            ],
            &[
                "3/8/2019",
                "Electronic accessories",
                "80.22",
                "5",
                "76.4",
                "9.6",
                "Naypyitaw",
                "Cash",
            ],
            &[
                "3/3/2019",
                "Home and lifestyle",
                "340.5255",
                "7",
                "324.31",
                "7.4",
                "Yangon",
                "Credit card",
            ],
        ],
    );
    let dashboard = Pipeline::default().run(&bytes).unwrap();
    let spec = DashboardSpec::build(&dashboard, &DashboardConfig::default());

    assert_eq!(spec.kpis[0].value, "$969.72");
    assert_eq!(spec.kpis[1].value, "19");
    assert_eq!(spec.kpis[2].value, "$923.54");
    assert_eq!(spec.kpis[3].value, "8.70");

    let Panel::Chart(monthly) = &spec.panels[0] else {
        panic!("monthly panel should be a chart");
    };
    assert_eq!(monthly.data.labels, ["2019-01-01", "2019-03-01"]);
    assert_eq!(spec.preview.rows.len(), 3);
}

#[test]
fn test_spec_without_rating() {
    let bytes = workbook(
        &["Date", "Product line", "Total", "City", "Payment"],
        &[&["1/5/2019", "Health and beauty", "10", "Yangon", "Cash"]],
    );
    let dashboard = Pipeline::default().run(&bytes).unwrap();
    let spec = DashboardSpec::build(&dashboard, &DashboardConfig::default());

    assert!(matches!(spec.panels[0], Panel::Chart(_)));
    assert!(matches!(spec.panels[1], Panel::Chart(_)));
    assert!(matches!(
        &spec.panels[2],
        Panel::NoData { reason, .. } if reason == "missing column 'Rating'"
    ));
    assert!(matches!(spec.panels[3], Panel::Chart(_)));
    assert_eq!(spec.kpis[3].value, "no data");

    let html = spec.to_html().unwrap();
    assert!(html.contains("Rating by City"));
}
