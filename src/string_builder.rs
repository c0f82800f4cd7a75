//! 语句文本拼接工具：按“一行一条语句”的方式累积 SQL。

#[derive(Debug, Default, Clone)]
pub(crate) struct StringBuilder {
    buf: String,
}

impl StringBuilder {
    pub(crate) fn new() -> Self {
        Self { buf: String::new() }
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            buf: String::with_capacity(n),
        }
    }

    /// 写入一行语句；如果不是首次写入，会先写入一个换行。
    pub(crate) fn write_line(&mut self, s: &str) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(s);
    }

    /// 按顺序写入多行语句（跳过空串）。
    pub(crate) fn write_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            if !line.is_empty() {
                self.write_line(line);
            }
        }
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub(crate) fn write_char(&mut self, c: char) {
        self.buf.push(c);
    }

    /// 以 `sep` 连接写入 `items`，空串不参与连接。
    pub(crate) fn write_strings<I, S>(&mut self, items: I, sep: &str)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first_added = false;
        for s in items {
            let s = s.as_ref();
            if s.is_empty() {
                continue;
            }
            if first_added {
                self.buf.push_str(sep);
            }
            self.buf.push_str(s);
            first_added = true;
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::StringBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn write_line_separates_with_newline() {
        let mut sb = StringBuilder::new();
        sb.write_line("SELECT 1;");
        sb.write_line("SELECT 2;");
        assert_eq!(sb.into_string(), "SELECT 1;\nSELECT 2;");
    }

    #[test]
    fn write_strings_skips_empty() {
        let mut sb = StringBuilder::with_capacity(16);
        sb.write_strings(["a", "", "b"], ", ");
        assert_eq!(sb.into_string(), "a, b");
    }

    #[test]
    fn write_lines_skips_empty() {
        let mut sb = StringBuilder::new();
        sb.write_lines(["", "x;", "", "y;"]);
        assert_eq!(sb.into_string(), "x;\ny;");
    }
}
