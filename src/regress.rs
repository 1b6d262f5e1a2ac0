use super::error::{Result,Error};
use super::summary::{RegionSummary,has_column};


#[derive(Clone,Debug)]
pub struct FittedModel {
    pub response: String,
    pub predictors: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub intercept_se: f64,
    pub standard_errors: Vec<f64>,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    pub n_observations: usize,
}


// Ordinary least squares over the rows where the response and every
// predictor are present (listwise deletion). Statistics that need more
// residual degrees of freedom than the data has come back non-finite;
// a singular design is a typed error.
pub fn fit(rows: &[RegionSummary], response: &str, predictors: &[&str]) -> Result<FittedModel> {

    let mut design: Vec<Vec<f64>> = Vec::new();
    let mut responses: Vec<f64> = Vec::new();

    for row in rows {
	let y = row.column(response)?;
	let xs: Vec<Option<f64>> = predictors.iter()
	    .map(|predictor| row.column(predictor))
	    .collect::<Result<_>>()?;
	match y {
	    Some(y) if y.is_finite()
		&& xs.iter().all(|x| x.map_or(false, |x| x.is_finite())) => {
		let mut x = Vec::with_capacity(predictors.len() + 1);
		x.push(1.0);
		x.extend(xs.into_iter().map(|x| x.unwrap_or(0.0)));
		design.push(x);
		responses.push(y);
	    }
	    _ => (),
	}
    }

    let n = responses.len();
    let k = predictors.len() + 1;
    if n == 0 {
	return Err(Error::MissingData);
    }
    if n < k {
	return Err(Error::Degenerate("fewer complete rows than parameters"));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (x,y) in design.iter().zip(responses.iter()) {
	for i in 0..k {
	    for j in 0..k {
		xtx[i][j] += x[i] * x[j];
	    }
	    xty[i] += x[i] * y;
	}
    }

    let inverse = invert(&xtx)?;
    let beta: Vec<f64> = (0..k).map(
	|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum()
    ).collect();

    let mean = responses.iter().sum::<f64>() / n as f64;
    let mut rss = 0.0;
    let mut tss = 0.0;
    for (x,y) in design.iter().zip(responses.iter()) {
	let fitted: f64 = beta.iter().zip(x.iter()).map(|(b,x)| b * x).sum();
	rss += (y - fitted) * (y - fitted);
	tss += (y - mean) * (y - mean);
    }

    let r_squared = match tss > 0.0 {
	true => 1.0 - rss / tss,
	false => f64::NAN,
    };
    let df = (n - k) as f64;
    let sigma_squared = match df > 0.0 {
	true => rss / df,
	false => f64::NAN,
    };
    let errors: Vec<f64> = (0..k).map(|i| (sigma_squared * inverse[i][i]).sqrt()).collect();
    let adjusted_r_squared = match df > 0.0 && tss > 0.0 {
	true => 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df,
	false => f64::NAN,
    };

    Ok(FittedModel {
	response: response.to_string(),
	predictors: predictors.iter().map(|predictor| predictor.to_string()).collect(),
	coefficients: beta[1..].to_vec(),
	intercept: beta[0],
	intercept_se: errors[0],
	standard_errors: errors[1..].to_vec(),
	r_squared,
	adjusted_r_squared,
	n_observations: n,
    })

}


// The target table must carry every predictor column the model was
// fitted on; a row missing a predictor value predicts None.
pub fn predict(model: &FittedModel, rows: &[RegionSummary]) -> Result<Vec<Option<f64>>> {

    for predictor in model.predictors.iter() {
	if !has_column(predictor) {
	    return Err(Error::UnknownColumn(predictor.clone()));
	}
    }

    rows.iter().map(|row| {
	let mut value = model.intercept;
	for (predictor,coefficient) in model.predictors.iter().zip(model.coefficients.iter()) {
	    match row.column(predictor)? {
		Some(x) if x.is_finite() => value += coefficient * x,
		_ => return Ok(None),
	    }
	}
	Ok(Some(value))
    }).collect()

}


// Gauss-Jordan with partial pivoting; small systems only.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {

    let n = matrix.len();
    let scale = matrix.iter().flat_map(|row| row.iter())
	.fold(0.0f64, |acc,value| acc.max(value.abs()));
    let tolerance = scale * 1e-12 + 1e-12;

    let mut work: Vec<Vec<f64>> = matrix.iter().enumerate().map(
	|(i,row)| row.iter().cloned()
	    .chain((0..n).map(|j| if i == j { 1.0 } else { 0.0 }))
	    .collect()
    ).collect();

    for column in 0..n {

	let mut pivot = column;
	for row in column+1..n {
	    if work[row][column].abs() > work[pivot][column].abs() {
		pivot = row;
	    }
	}
	if work[pivot][column].abs() < tolerance {
	    return Err(Error::Degenerate("singular normal equations"));
	}
	work.swap(pivot, column);

	let divisor = work[column][column];
	for j in 0..2*n {
	    work[column][j] /= divisor;
	}

	for row in 0..n {
	    if row != column && work[row][column] != 0.0 {
		let factor = work[row][column];
		for j in 0..2*n {
		    work[row][j] -= factor * work[column][j];
		}
	    }
	}

    }

    Ok(work.iter().map(|row| row[n..].to_vec()).collect())

}
