use super::error::Result;
use super::summary::RegionSummary;


#[derive(Clone,Debug)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}


// Each pair is computed over the rows where both of its values are
// present, independently per pair.
pub fn correlation_matrix(rows: &[RegionSummary], columns: &[&str]) -> Result<CorrelationMatrix> {

    let series: Vec<Vec<Option<f64>>> = columns.iter().map(
	|column| rows.iter().map(|row| row.column(column)).collect()
    ).collect::<Result<_>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
	for j in i..n {
	    let (xs,ys): (Vec<f64>,Vec<f64>) = series[i].iter().zip(series[j].iter())
		.filter_map(|(x,y)| match (x,y) {
		    (Some(x),Some(y)) if x.is_finite() && y.is_finite() => Some((*x,*y)),
		    _ => None,
		}).unzip();
	    let r = pearson(&xs, &ys);
	    values[i][j] = r;
	    values[j][i] = r;
	}
    }

    Ok(CorrelationMatrix {
	columns: columns.iter().map(|column| column.to_string()).collect(),
	values,
    })

}


// NaN when either column has no variance over the eligible rows.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {

    let n = xs.len().min(ys.len());
    if n < 2 {
	return f64::NAN;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    let mut sum_xy = 0.0;

    for i in 0..n {
	let x = xs[i];
	let y = ys[i];
	sum_x += x;
	sum_y += y;
	sum_xx += x * x;
	sum_yy += y * y;
	sum_xy += x * y;
    }

    let nf = n as f64;
    let num = nf * sum_xy - sum_x * sum_y;
    let den_x = nf * sum_xx - sum_x * sum_x;
    let den_y = nf * sum_yy - sum_y * sum_y;

    match den_x > 0.0 && den_y > 0.0 {
	false => f64::NAN,
	true => (num / (den_x * den_y).sqrt()).max(-1.0).min(1.0),
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use super::super::summary::summarize;
    use super::super::aggregate::RegionDayRecord;
    use chrono::naive::NaiveDate;

    fn summaries(rows: &[(&str,f64,f64,f64)]) -> Vec<RegionSummary> {
	summarize(&rows.iter().map(|(region,cases,deaths,population)| RegionDayRecord {
	    region: region.to_string(),
	    country: "US".to_string(),
	    date: NaiveDate::from_ymd(2021, 3, 1),
	    cases: *cases,
	    deaths: *deaths,
	    population: *population,
	    cases_per_million: cases * 1_000_000.0 / population,
	    deaths_per_million: deaths * 1_000_000.0 / population,
	    new_cases: 0.0,
	    new_deaths: 0.0,
	}).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn symmetric_with_unit_diagonal() {
	let rows = summaries(&[
	    ("Alpha", 30.0, 3.0, 1000.0),
	    ("Beta", 300.0, 30.0, 2000.0),
	    ("Gamma", 120.0, 6.0, 3000.0),
	]);
	let matrix = correlation_matrix(&rows, &["cases_per_thousand", "deaths_per_thousand", "peak_population"]).unwrap();
	for i in 0..3 {
	    assert!((matrix.values[i][i] - 1.0).abs() < 1e-12);
	    for j in 0..3 {
		assert_eq!(matrix.values[i][j], matrix.values[j][i]);
		assert!(matrix.values[i][j].abs() <= 1.0);
	    }
	}
    }

    #[test]
    fn perfectly_related_columns() {
	let rows = summaries(&[
	    ("Alpha", 30.0, 3.0, 1000.0),
	    ("Beta", 300.0, 30.0, 2000.0),
	]);
	let matrix = correlation_matrix(&rows, &["cases_per_thousand", "deaths_per_thousand"]).unwrap();
	assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_is_undefined() {
	let rows = summaries(&[
	    ("Alpha", 10.0, 1.0, 1000.0),
	    ("Beta", 20.0, 2.0, 1000.0),
	]);
	// peak_population is constant across both rows
	let matrix = correlation_matrix(&rows, &["cases_per_thousand", "peak_population"]).unwrap();
	assert!(matrix.values[0][1].is_nan());
	assert!(matrix.values[1][1].is_nan());
	assert!((matrix.values[0][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pairs_are_complete_pairwise_not_listwise() {
	let mut rows = summaries(&[
	    ("Alpha", 10.0, 1.0, 1000.0),
	    ("Beta", 20.0, 4.0, 1000.0),
	    ("Gamma", 30.0, 9.0, 1000.0),
	]);
	rows[2].doses_per_thousand = Some(300.0);
	rows[1].doses_per_thousand = Some(200.0);
	// Alpha never reports doses; the (cases, doses) pair must use
	// the two complete rows, the (cases, deaths) pair all three
	let matrix = correlation_matrix(&rows, &["cases_per_thousand", "doses_per_thousand"]).unwrap();
	assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
	let matrix = correlation_matrix(&rows, &["peak_cases", "peak_deaths"]).unwrap();
	let expected = pearson(&[10.0, 20.0, 30.0], &[1.0, 4.0, 9.0]);
	assert!((matrix.values[0][1] - expected).abs() < 1e-12);
    }

}
