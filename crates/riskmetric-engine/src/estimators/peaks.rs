/// Indices of local maxima in `data`, filtered by horizontal distance and
/// topographic prominence.
///
/// Pipeline: strict local maxima (a flat top counts once, at its midpoint),
/// then tallest-first suppression of neighbours closer than `min_distance`
/// samples, then removal of peaks whose prominence is below
/// `min_prominence`. Results are in ascending index order.
pub fn find_peaks(data: &[f64], min_distance: usize, min_prominence: f64) -> Vec<usize> {
    let candidates = local_maxima(data);
    let spaced = select_by_distance(data, &candidates, min_distance.max(1));
    spaced
        .into_iter()
        .filter(|&peak| prominence(data, peak) >= min_prominence)
        .collect()
}

fn local_maxima(data: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if data.len() < 3 {
        return peaks;
    }
    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }
            if data[ahead] < data[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

fn select_by_distance(data: &[f64], peaks: &[usize], min_distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| {
        data[peaks[a]]
            .partial_cmp(&data[peaks[b]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &i in order.iter().rev() {
        if !keep[i] {
            continue;
        }
        let mut k = i;
        while k > 0 {
            k -= 1;
            if peaks[i] - peaks[k] >= min_distance {
                break;
            }
            keep[k] = false;
        }
        for k in i + 1..peaks.len() {
            if peaks[k] - peaks[i] >= min_distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Height of a peak above the higher of its two bases. Each base is the
/// lowest sample between the peak and the nearest strictly higher sample
/// (or the series edge) on that side.
fn prominence(data: &[f64], peak: usize) -> f64 {
    let height = data[peak];

    let mut left_min = height;
    for &v in data[..peak].iter().rev() {
        if v > height {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = height;
    for &v in &data[peak + 1..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }

    height - left_min.max(right_min)
}
