//! Builds the report input for one machine from the database.
//!
//! The report crate never touches the database; this module walks the
//! machine's measurement chain and hands over plain records.

use diesel::prelude::*;
use vibro_report::chart::TrendSample;
use vibro_report::report::{MeasurementSection, ReportData};

use crate::models::Machine;
use crate::orm::image::{ImageFilter, list_images};
use crate::orm::measurement::measurements_for_machine;
use crate::orm::point::points_for_measurement;
use crate::orm::scope::TenantScope;
use crate::orm::tendency::tendencies_for_point;
use crate::schema::companies;

/// Collects everything the renderer needs for one machine's report.
///
/// Measurement sections come out oldest first; each section carries the
/// tendency samples of every point of that measurement, in collector
/// order.
pub fn report_data_for_machine(
    conn: &mut SqliteConnection,
    machine: &Machine,
    report_date: &str,
) -> Result<ReportData, diesel::result::Error> {
    let company_name: String = companies::table
        .filter(companies::id.eq(machine.company_id))
        .select(companies::name)
        .first(conn)?;

    let diagram_image = list_images(
        conn,
        TenantScope::All,
        &ImageFilter { machine: Some(machine.id), ..Default::default() },
    )?
    .into_iter()
    .next()
    .map(|i| i.file_path);

    let mut sections = Vec::new();
    for measurement in measurements_for_machine(conn, machine.id)? {
        let mut samples = Vec::new();
        for point in points_for_measurement(conn, measurement.id)? {
            for t in tendencies_for_point(conn, point.id)? {
                samples.push(TrendSample { name: t.name, date: t.date, value: t.value });
            }
        }

        let mut dates: Vec<&str> = samples.iter().map(|s| s.date.as_str()).collect();
        dates.sort_unstable();
        dates.dedup();
        let current_date = dates.last().map(|d| (*d).to_string());
        let previous_date = if dates.len() > 1 {
            dates.get(dates.len() - 2).map(|d| (*d).to_string())
        } else {
            None
        };

        sections.push(MeasurementSection {
            machine_name: machine.name.clone(),
            title: format!("{} ({})", machine.name, measurement.date.format("%d/%m/%Y")),
            severity: measurement.severity,
            analysis: measurement.analysis,
            recommendation: measurement.recommendation,
            samples,
            previous_date,
            current_date,
            diagram_image: diagram_image.clone(),
            machine_image: None,
            spec_rows: vec![
                ("Identificador".into(), machine.identifier.clone()),
                ("Tipo de maquina".into(), machine.machine_type.clone()),
            ],
        });
    }

    Ok(ReportData {
        company_name,
        report_date: report_date.to_string(),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn chain_records_land_in_one_section() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");

        let data = report_data_for_machine(&mut conn, &a.machine, "10 de Marzo de 2026").unwrap();
        assert_eq!(data.company_name, a.company.name);
        assert_eq!(data.sections.len(), 1);

        let section = &data.sections[0];
        assert_eq!(section.samples.len(), 1);
        assert_eq!(section.samples[0].name, a.tendency.name);
        assert_eq!(section.current_date.as_deref(), Some(a.tendency.date.as_str()));
        assert_eq!(section.previous_date, None);
        assert_eq!(section.diagram_image.as_deref(), Some(a.image.file_path.as_str()));
    }

    #[test]
    fn machine_without_measurements_yields_empty_sections() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        crate::orm::measurement::delete_measurement(&mut conn, a.measurement.id).unwrap();

        let data = report_data_for_machine(&mut conn, &a.machine, "hoy").unwrap();
        assert!(data.sections.is_empty());
    }
}
