use std::fs::{self,File};
use std::io;
use std::path::{Path,PathBuf};

use log::info;
use serde_json::{json,Value};
use unidecode::unidecode;

use covid19_us_trends_rs::error::Result;
use covid19_us_trends_rs::aggregate::{self,NullPolicy};
use covid19_us_trends_rs::series::{self,WeeklyBucket};
use covid19_us_trends_rs::summary::{self,RegionSummary};
use covid19_us_trends_rs::stats::CorrelationMatrix;
use covid19_us_trends_rs::regress::{self,FittedModel};
use covid19_us_trends_rs::{csse,join,stats,vaccine};


fn main() {

    env_logger::init();

    if let Err(err) = run(&PathBuf::from("cache"), &PathBuf::from("output")) {
	eprintln!("Error: {}", err);
	std::process::exit(1);
    }

}


fn run(cache_path: &Path, output_path: &Path) -> Result<()> {

    fs::create_dir_all(output_path)?;

    let confirmed = csse::confirmed(cache_path)?;
    let deaths = csse::deaths(cache_path)?;
    info!("{} confirmed values, {} death values", confirmed.len(), deaths.len());

    let observations = join::filter_analyzable(join::join(&confirmed, &deaths));
    let mut records = aggregate::aggregate(&observations, NullPolicy::ZeroFill)?;
    series::difference(&mut records);
    info!("{} region-day records", records.len());

    write_weekly(&output_path.join("weekly.json"), &series::weekly(&records))?;

    let regions_path = output_path.join("regions");
    fs::create_dir_all(&regions_path)?;
    let mut start = 0;
    for end in 1..=records.len() {
	if end == records.len() || records[end].region != records[start].region {
	    write_weekly(&regions_path.join(format!("{}.json", unidecode(&records[start].region))),
			 &series::weekly(&records[start..end]))?;
	    start = end;
	}
    }

    let mut summaries = summary::summarize(&records)?;
    let vaccinations = vaccine::vaccinations(cache_path)?;
    summary::merge_vaccinations(&mut summaries, &vaccinations)?;
    info!("{} region summaries", summaries.len());

    let correlations = stats::correlation_matrix(&summaries, &[
	"cases_per_thousand", "deaths_per_thousand",
	"doses_per_thousand", "one_dose_per_thousand",
	"fully_vaccinated_per_thousand", "additional_doses_per_thousand",
    ])?;
    write_json(&output_path.join("correlations.json"), &correlation_value(&correlations))?;

    let base = regress::fit(&summaries, "deaths_per_thousand",
			    &["cases_per_thousand"])?;
    let predictions = regress::predict(&base, &summaries)?;
    for (summary,prediction) in summaries.iter_mut().zip(predictions) {
	summary.predicted_deaths_per_thousand = prediction;
    }

    let extended = regress::fit(&summaries, "deaths_per_thousand",
				&["cases_per_thousand", "fully_vaccinated_per_thousand"])?;
    let predictions = regress::predict(&extended, &summaries)?;
    for (summary,prediction) in summaries.iter_mut().zip(predictions) {
	summary.predicted_deaths_per_thousand_vaccine = prediction;
    }

    info!("base model R2 = {:.4}, with vaccination R2 = {:.4}",
	  base.r_squared, extended.r_squared);

    write_json(&output_path.join("models.json"),
	       &json!([model_value(&base), model_value(&extended)]))?;
    write_json(&output_path.join("summary.json"), &summary_value(&summaries))?;

    Ok(())

}


fn write_json(path: &Path, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(io::BufWriter::new(File::create(path)?), value)?;
    Ok(())
}


fn write_weekly(path: &Path, weeks: &[WeeklyBucket]) -> Result<()> {
    write_json(path, &Value::Array(weeks.iter().map(|week| json!({
	"week_start": format!("{}", week.week_start.format("%Y-%m-%d")),
	"weekly_new_cases": week.weekly_new_cases,
	"weekly_new_deaths": week.weekly_new_deaths,
    })).collect()))
}


fn summary_value(summaries: &[RegionSummary]) -> Value {
    Value::Array(summaries.iter().map(|summary| json!({
	"region": summary.region,
	"peak_cases": summary.peak_cases,
	"peak_deaths": summary.peak_deaths,
	"peak_population": summary.peak_population,
	"cases_per_thousand": summary.cases_per_thousand,
	"deaths_per_thousand": summary.deaths_per_thousand,
	"doses_per_thousand": summary.doses_per_thousand,
	"one_dose_per_thousand": summary.one_dose_per_thousand,
	"fully_vaccinated_per_thousand": summary.fully_vaccinated_per_thousand,
	"additional_doses_per_thousand": summary.additional_doses_per_thousand,
	"predicted_deaths_per_thousand": summary.predicted_deaths_per_thousand,
	"predicted_deaths_per_thousand_vaccine": summary.predicted_deaths_per_thousand_vaccine,
    })).collect())
}


fn correlation_value(matrix: &CorrelationMatrix) -> Value {
    json!({
	"columns": matrix.columns,
	"values": matrix.values,
    })
}


fn model_value(model: &FittedModel) -> Value {
    json!({
	"response": model.response,
	"predictors": model.predictors,
	"coefficients": model.coefficients,
	"intercept": model.intercept,
	"intercept_se": model.intercept_se,
	"standard_errors": model.standard_errors,
	"r_squared": model.r_squared,
	"adjusted_r_squared": model.adjusted_r_squared,
	"observations": model.n_observations,
    })
}
