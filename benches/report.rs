// benches/report.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use foodcli::report::ReportAssembler;
use foodcli::specs::mynetdiary;

const NUTRIENTS: [&str; 12] = [
    "Calories", "Fat", "Sat Fat", "Cholesterol", "Sodium", "Carbs", "Fiber", "Sugars", "Protein", "Potassium",
    "Calcium", "Iron",
];

/// A report page with `foods` food rows plus the two summary rows.
fn synthetic_report(foods: usize) -> String {
    let mut html = String::from("<html><body><table class=\"report\"><thead><tr><td>Food</td>");
    for n in NUTRIENTS {
        html.push_str(&format!("<td title=\"{n} column\">{n}</td>"));
    }
    html.push_str("</tr></thead><tbody><tr><td>Breakfast</td></tr>");
    for i in 0..foods {
        html.push_str(&format!("<tr><td>Food&nbsp;{i}</td><td>1 cup</td><td>{}g</td>", 50 + i));
        for j in 0..NUTRIENTS.len() {
            html.push_str(&format!("<td>&nbsp;{},{:03}</td>", j, i));
        }
        html.push_str("</tr>");
    }
    for label in ["Totals over the period", "Daily percentage"] {
        html.push_str(&format!("<tr><td>{label}</td>"));
        for _ in NUTRIENTS {
            html.push_str("<td>12%</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></body></html>");
    html
}

fn bench_report(c: &mut Criterion) {
    let doc = synthetic_report(40);
    let start = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap_or_default();

    c.bench_function("report_parse_page", |b| {
        b.iter(|| {
            let page = mynetdiary::parse_report_page(black_box(&doc), start);
            black_box(page.map(|p| p.rows.len()).unwrap_or_default())
        })
    });

    c.bench_function("report_assemble_30_days", |b| {
        b.iter(|| {
            let pages = start
                .iter_days()
                .take(30)
                .map(|day| mynetdiary::parse_report_page(black_box(&doc), day));
            black_box(ReportAssembler::new(pages).filter(|r| r.is_ok()).count())
        })
    });
}

criterion_group!(benches, bench_report);
criterion_main!(benches);
