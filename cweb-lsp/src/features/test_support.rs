pub(crate) const SAMPLE: &str = r"% Sample CWEB program
\input cwebmac

@* Introduction. This program prints a greeting.

@c
@<Header files@>@;
int main(void)
{
  @<Print the greeting@>@;
  return 0;
}

@ We need the standard I/O library.
@<Header files@>=
#include <stdio.h>

@ Printing is a single call.
@<Print the greeting@>=
printf(Hello, world!\n);

@* Index.
";

pub(crate) fn sample_source() -> &'static str {
    SAMPLE
}
