mod count_parser_tests;
