use std::path::Path;

use chrono::naive::NaiveDate;
use serde::Deserialize;

use super::error::Result;
use super::fetch;


#[derive(Deserialize)]
struct Row {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Province_State")]
    region: String,
    #[serde(rename = "Country_Region")]
    country: String,
    #[serde(rename = "Doses_admin", default)]
    doses_admin: Option<f64>,
    #[serde(rename = "People_at_least_one_dose", default)]
    people_one_dose: Option<f64>,
    #[serde(rename = "People_fully_vaccinated", default)]
    people_fully_vaccinated: Option<f64>,
    #[serde(rename = "Total_additional_doses", default)]
    additional_doses: Option<f64>,
}

#[derive(Clone,Debug)]
pub struct VaccineRecord {
    pub region: String,
    pub country: String,
    pub date: NaiveDate,
    pub doses_admin: Option<f64>,
    pub people_one_dose: Option<f64>,
    pub people_fully_vaccinated: Option<f64>,
    pub additional_doses: Option<f64>,
}


pub fn vaccinations(cache_path: &Path) -> Result<Vec<VaccineRecord>> {
    let text = fetch::fetch_cached(
	cache_path, "time_series_covid19_vaccine_us.csv",
	"https://raw.githubusercontent.com/govex/COVID-19\
	 /master/data_tables/vaccine_data/us_data/time_series\
	 /time_series_covid19_vaccine_us.csv")?;
    parse(&text)
}


pub fn parse(text: &str) -> Result<Vec<VaccineRecord>> {
    csv::Reader::from_reader(text.as_bytes()).into_deserialize().map(|row| {
	let row: Row = row?;
	Ok(VaccineRecord {
	    date: NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")?,
	    region: row.region,
	    country: row.country,
	    doses_admin: row.doses_admin,
	    people_one_dose: row.people_one_dose,
	    people_fully_vaccinated: row.people_fully_vaccinated,
	    additional_doses: row.additional_doses,
	})
    }).collect()
}
