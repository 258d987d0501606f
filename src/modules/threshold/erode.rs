use crate::modules::Mask;

/// Binary erosion with a square structuring element.
///
/// Pixels outside the image count as background, so regions touching the
/// border shrink too. An even `kernel` behaves like the next odd size.
#[derive(Debug, Clone)]
pub struct Erode {
	kernel: u32,
	iterations: u32,

	scratch: Mask,
	line: Vec<u8>,
	line_out: Vec<u8>,
	runs: Vec<usize>,
}

impl Erode {
	pub fn new(kernel: u32, iterations: u32) -> Self {
		Self {
			kernel,
			iterations,
			scratch: Mask::new(0, 0),
			line: Vec::new(),
			line_out: Vec::new(),
			runs: Vec::new(),
		}
	}

	pub fn run(&mut self, src: &Mask, dst: &mut Mask) {
		let (w, h) = src.dimensions();
		if dst.dimensions() != (w, h) {
			*dst = Mask::new(w, h);
		}
		dst.copy_from_slice(src.as_raw());

		let r = (self.kernel / 2) as usize;
		if r == 0 || w == 0 || h == 0 {
			return;
		}
		if self.scratch.dimensions() != (w, h) {
			self.scratch = Mask::new(w, h);
		}

		let (w, h) = (w as usize, h as usize);
		let out: &mut [u8] = dst;
		let scratch: &mut [u8] = &mut self.scratch;
		for _ in 0..self.iterations {
			if out.iter().all(|&p| p == 0) {
				break;
			}

			// rows: out -> scratch
			for (row_in, row_out) in out.chunks_exact(w).zip(scratch.chunks_exact_mut(w)) {
				erode_line(row_in, row_out, r, &mut self.runs);
			}

			// columns: scratch -> out
			self.line.resize(h, 0);
			self.line_out.resize(h, 0);
			for x in 0..w {
				for y in 0..h {
					self.line[y] = scratch[y * w + x];
				}
				erode_line(&self.line, &mut self.line_out, r, &mut self.runs);
				for y in 0..h {
					out[y * w + x] = self.line_out[y];
				}
			}
		}
	}
}

// out[i] is 255 iff line[i - r..=i + r] lies inside the line and is all 255.
fn erode_line(line: &[u8], out: &mut [u8], r: usize, runs: &mut Vec<usize>) {
	runs.clear();
	let mut run = 0;
	for &p in line {
		run = if p == 255 { run + 1 } else { 0 };
		runs.push(run);
	}

	let width = 2 * r + 1;
	for (i, o) in out.iter_mut().enumerate() {
		*o = match runs.get(i + r) {
			Some(&run) if run >= width => 255,
			_ => 0,
		};
	}
}
